//! reelbase-api - Film catalog service
//!
//! Serves a movie catalog over REST (`/movies/...`) and GraphQL
//! (`/graphql`), backed by SQLite and populated from a filmography source.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use reelbase_api::db::{self, SqliteCatalog};
use reelbase_api::source::build_source;
use reelbase_api::{build_router, AppState, GatewaySettings};
use reelbase_common::config::{ConfigOverrides, ServiceConfig};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for reelbase-api
#[derive(Parser, Debug)]
#[command(name = "reelbase-api")]
#[command(about = "Film catalog service with REST and GraphQL endpoints")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "REELBASE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "REELBASE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "REELBASE_PORT")]
    port: Option<u16>,

    /// Database connection string (e.g. sqlite://denzel.db?mode=rwc)
    #[arg(long, env = "REELBASE_DATABASE_URL")]
    database_url: Option<String>,

    /// Database name, used to derive the connection string
    #[arg(long, env = "REELBASE_DATABASE_NAME")]
    database_name: Option<String>,

    /// Metascore a movie must exceed to be a must-watch
    #[arg(long, env = "REELBASE_METASCORE_THRESHOLD")]
    metascore_threshold: Option<i64>,

    /// Person whose filmography populates the catalog
    #[arg(long, env = "REELBASE_SUBJECT_ID")]
    subject_id: Option<String>,

    /// Upper bound applied to search `limit`
    #[arg(long, env = "REELBASE_MAX_SEARCH_LIMIT")]
    max_search_limit: Option<i64>,

    /// Base URL of the filmography provider
    #[arg(long, env = "REELBASE_SOURCE_URL")]
    source_url: Option<String>,

    /// Local JSON filmography file (instead of the provider)
    #[arg(long, env = "REELBASE_SOURCE_FILE", conflicts_with = "source_url")]
    source_file: Option<PathBuf>,

    /// Provider request timeout in seconds
    #[arg(long, env = "REELBASE_SOURCE_TIMEOUT_SECS")]
    source_timeout_secs: Option<u64>,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "REELBASE_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_path: args.config,
            host: args.host,
            port: args.port,
            database_url: args.database_url,
            database_name: args.database_name,
            metascore_threshold: args.metascore_threshold,
            subject_id: args.subject_id,
            max_search_limit: args.max_search_limit,
            source_url: args.source_url,
            source_file: args.source_file,
            source_timeout_secs: args.source_timeout_secs,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServiceConfig::load(args.into()).context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "reelbase_api={level},reelbase_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting reelbase-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        "Subject: {}, must-watch threshold: {}",
        config.subject_id, config.metascore_threshold
    );

    let pool = match db::connect(&config.database_url).await {
        Ok(pool) => {
            info!("✓ Connected to database `{}`", config.database_name);
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let source = build_source(&config).context("Failed to initialize filmography source")?;
    info!("Filmography source: {}", source.describe());

    let catalog = Arc::new(SqliteCatalog::new(pool, source, config.subject_id.clone()));
    let state = AppState::new(catalog, GatewaySettings::from(&config));
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("reelbase-api listening on http://{}", addr);
    info!("GraphiQL: http://{}/graphql", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
