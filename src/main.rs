//! Damso notification server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use damso_core::bus::EventBus;
use damso_core::config::AppConfig;
use damso_core::config::stream::BusProvider;
use damso_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DAMSO_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Damso v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = damso_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    damso_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Event bus ────────────────────────────────────────
    let bus: Arc<dyn EventBus> = match config.stream.provider {
        BusProvider::Memory => {
            tracing::info!("Using in-memory event bus (single node)");
            Arc::new(damso_realtime::MemoryBus::new(config.stream.buffer_size))
        }
        BusProvider::Postgres => {
            tracing::info!("Using PostgreSQL LISTEN/NOTIFY event bus");
            Arc::new(damso_realtime::PostgresBus::new(
                db_pool.clone(),
                config.stream.buffer_size,
            ))
        }
    };

    // ── Step 3: HTTP server with graceful shutdown ───────────────
    damso_api::app::run_server(config, db_pool, bus).await
}
