//! Metric name constants.

use std::time::Duration;

use anyhow::Context;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config;

pub const AUTH_FAILED: &str = "therapyhub.auth.failed"; // Counter.
pub const USERS_REGISTERED: &str = "therapyhub.users.registered"; // Counter.

pub const POSTS_CREATED: &str = "therapyhub.posts.created"; // Counter.
pub const REPLIES_CREATED: &str = "therapyhub.replies.created"; // Counter.
pub const REPLIES_FLAGGED: &str = "therapyhub.replies.flagged"; // Counter.

pub const MODERATION_APPROVED: &str = "therapyhub.moderation.approved"; // Counter.
pub const MODERATION_DELETED: &str = "therapyhub.moderation.deleted"; // Counter.

/// Must be ran exactly once on startup. This will declare all of the instruments for `metrics`.
pub fn setup(config: Option<&config::MetricConfig>) -> anyhow::Result<()> {
    describe_counter!(AUTH_FAILED, "The number of failed authentication attempts.");
    describe_counter!(USERS_REGISTERED, "The number of accounts registered.");

    describe_counter!(POSTS_CREATED, "The count of created posts.");
    describe_counter!(REPLIES_CREATED, "The count of created replies.");
    describe_counter!(
        REPLIES_FLAGGED,
        "The count of replies held for moderator review on submission."
    );

    describe_counter!(MODERATION_APPROVED, "The count of flagged replies approved.");
    describe_counter!(MODERATION_DELETED, "The count of replies deleted by moderators.");

    if let Some(config) = config {
        match config {
            config::MetricConfig::PrometheusPush(prometheus_config) => {
                PrometheusBuilder::new()
                    .with_push_gateway(
                        prometheus_config.url.as_str(),
                        Duration::from_secs(10),
                        None,
                        None,
                    )
                    .context("failed to set up push gateway")?
                    .install()
                    .context("failed to install metrics exporter")?;
            }
        }
    }

    Ok(())
}
