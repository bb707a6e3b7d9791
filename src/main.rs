//! MallHub Server
//!
//! Main entry point: loads configuration, connects the database, and starts
//! the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use mallhub_core::config::AppConfig;
use mallhub_core::error::AppError;
use mallhub_database::DatabasePool;
use mallhub_database::migration::run_migrations;

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
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default`, the `MALLHUB_ENV` overlay, and `MALLHUB__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("MALLHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
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
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting MallHub v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.upload.path).await?;

    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;

    mallhub_api::run_server(config, pool).await
}
