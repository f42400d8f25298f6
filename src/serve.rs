use super::auth::ensure_admin;
use super::config::AppConfig;
use super::db::establish_pool;
pub use super::error::Error;
use super::moderation::{LexiconScorer, ModerationPipeline};
use anyhow::Context as _;
use axum::{Router, extract::FromRef, routing::get};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity, log::LevelFilter};
use figment::{Figment, providers::Format as _};
use sqlx::SqlitePool;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// The application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;
/// The database connection pool.
pub type Db = SqlitePool;

#[derive(Parser, Debug, Clone)]
/// Command line arguments.
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "default.toml")]
    pub config: PathBuf,
    /// The verbosity level.
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

#[derive(Clone, FromRef)]
/// The application state, shared across all routes.
pub struct AppState {
    /// The application configuration.
    pub(crate) config: AppConfig,
    /// The database connection pool.
    pub db: Db,
    /// Annotates posts and replies on submission.
    pub pipeline: ModerationPipeline,
}

impl AppState {
    /// Open the database and build the moderation pipeline from `config`.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db = establish_pool(&config.db)
            .await
            .context("failed to establish database connection pool")?;
        let pipeline =
            ModerationPipeline::new(config.lexicon.clone(), Arc::new(LexiconScorer::default()));

        Ok(Self {
            config,
            db,
            pipeline,
        })
    }
}

/// Build the router for `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(super::index))
        .nest("/api", super::endpoints::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The main application entry point.
pub async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    // Set up trace logging to console and account for the user-provided verbosity flag.
    if args.verbosity.log_level_filter() != LevelFilter::Off {
        let lvl = match args.verbosity.log_level_filter() {
            LevelFilter::Error => tracing::Level::ERROR,
            LevelFilter::Warn => tracing::Level::WARN,
            LevelFilter::Info | LevelFilter::Off => tracing::Level::INFO,
            LevelFilter::Debug => tracing::Level::DEBUG,
            LevelFilter::Trace => tracing::Level::TRACE,
        };
        tracing_subscriber::fmt().with_max_level(lvl).init();
    }

    if !args.config.exists() {
        // Not fatal: every setting can also come from the environment.
        warn!(
            "configuration file {} does not exist",
            args.config.display()
        );
    }

    // Read and parse the user-provided configuration.
    let config: AppConfig = Figment::new()
        .admerge(figment::providers::Toml::file(args.config))
        .admerge(figment::providers::Env::prefixed("THERAPYHUB_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Initialize metrics reporting.
    super::metrics::setup(config.metrics.as_ref()).context("failed to set up metrics exporter")?;

    let state = AppState::new(config.clone()).await?;

    let generated = ensure_admin(&state.db, &config)
        .await
        .context("failed to set up administrator")?;

    if let Some(password) = generated {
        // N.B: This is a sensitive message, so we're bypassing `tracing` here and
        // logging it directly to console.
        println!("=====================================");
        println!("            FIRST STARTUP            ");
        println!("=====================================");
        println!("Administrator account created:");
        println!("username: {}", config.admin.username);
        println!("password: {password}");
        println!("=====================================");
    }

    let addr = config
        .listen_address
        .unwrap_or(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000));

    let listener = TcpListener::bind(&addr)
        .await
        .context("failed to bind address")?;

    info!("listening on {addr}");
    info!("connect to: http://127.0.0.1:{}", addr.port());

    axum::serve(listener, app(state).into_make_service())
        .await
        .context("failed to serve app")
}
