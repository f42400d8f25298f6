use std::net::SocketAddr;

use serde::Deserialize;
use url::Url;

use crate::moderation::Lexicon;

#[derive(Deserialize, Debug, Clone)]
pub struct AdminConfig {
    /// Login name of the bootstrap administrator.
    #[serde(default = "default_admin_username")]
    pub username: String,
    /// Name shown next to the administrator's posts.
    #[serde(default = "default_admin_display_name")]
    pub display_name: String,
    /// Initial password. When unset, a random one is generated and printed on first start.
    pub password: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            display_name: default_admin_display_name(),
            password: None,
        }
    }
}

fn default_admin_username() -> String {
    "admin".to_owned()
}

fn default_admin_display_name() -> String {
    "TherapyHub Admin".to_owned()
}

#[derive(Deserialize, Debug, Clone)]
pub struct SessionConfig {
    /// Lifetime of a login session.
    pub ttl_hours: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_hours: 7 * 24 }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PrometheusConfig {
    /// The URL of the Prometheus push gateway.
    pub url: Url,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum MetricConfig {
    PrometheusPush(PrometheusConfig),
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub listen_address: Option<SocketAddr>,
    /// SQLite database URL, e.g. `sqlite://data/therapyhub.db`.
    pub db: String,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub lexicon: Lexicon,
    pub metrics: Option<MetricConfig>,
}
