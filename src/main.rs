//! # MTT Gateway
//!
//! Main entry point for the MTT Gateway service.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mtt_gateway::api::middleware::logging::LoggingConfig;
use mtt_gateway::api::rest::AppState;
use mtt_gateway::api::rest::routes::{RouterOptions, create_router_with};
use mtt_gateway::application::SeedDemoDataUseCase;
use mtt_gateway::config::{AppConfig, DatabaseConfig, LogConfig, LogFormat};
use mtt_gateway::infrastructure::persistence::StoreFactory;
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line interface.
#[derive(Debug, Parser)]
#[command(name = "mtt-gateway", version, about = "MTT Gateway payment service")]
struct Cli {
    /// Configuration file, overriding `MTT_GATEWAY_CONFIG_FILE`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// Insert the demo records when the store holds no users.
        #[arg(long)]
        seed: bool,
    },
    /// Create the record tables and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.validate().context("validating configuration")?;

    init_tracing(&config.log);

    info!(
        service = %config.service_name,
        environment = %config.environment,
        "Starting MTT Gateway v{}",
        env!("CARGO_PKG_VERSION")
    );

    let factory = store_factory(&config.database).await?;
    factory.migrate().await.context("migrating database")?;

    match cli.command.unwrap_or(Command::Serve { seed: false }) {
        Command::Migrate => {
            info!("Migration complete");
            Ok(())
        }
        Command::Serve { seed } => serve(&config, factory, seed).await,
    }
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(log.include_target);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

async fn store_factory(database: &DatabaseConfig) -> anyhow::Result<StoreFactory> {
    let Some(url) = database.url() else {
        warn!("No database configured, records are kept in memory");
        return Ok(StoreFactory::InMemory);
    };

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .acquire_timeout(database.connect_timeout())
        .idle_timeout(database.idle_timeout())
        .connect(url)
        .await
        .context("connecting to database")?;

    info!(max_connections = database.max_connections, "Connected to PostgreSQL");
    Ok(StoreFactory::Postgres(pool))
}

async fn serve(config: &AppConfig, factory: StoreFactory, seed: bool) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(factory.build()));

    if seed {
        let summary = SeedDemoDataUseCase::new(state.stores.clone())
            .execute()
            .await
            .context("seeding demo data")?;
        if summary.skipped {
            info!("Store already holds users, demo data not seeded");
        } else {
            info!(records = summary.created, "Demo data seeded");
        }
    }

    let mut logging = LoggingConfig::new();
    if config.rest.log_headers {
        logging = logging.with_headers();
    }
    let router = create_router_with(
        state,
        RouterOptions {
            logging,
            cors_origins: config.rest.cors_origins.clone(),
            request_timeout: config.rest.request_timeout(),
        },
    );

    let addr = config.rest.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("MTT Gateway listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Shutting down MTT Gateway");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
