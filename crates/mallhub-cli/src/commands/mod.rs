//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod serve;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use mallhub_auth::password::{PasswordHasher, PasswordValidator};
use mallhub_auth::JwtEncoder;
use mallhub_core::config::AppConfig;
use mallhub_database::DatabasePool;
use mallhub_service::{AdminService, UnitOfWork};

use crate::output::OutputFormat;

/// MallHub shopping mall backend
#[derive(Debug, Parser)]
#[command(name = "mallhub", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and the environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to merge over the defaults
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the MallHub server
    Serve(serve::ServeArgs),
    /// Apply pending database migrations
    Migrate,
    /// Admin account management
    Admin(admin::AdminArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = AppConfig::load_from(&self.config, &self.env)
            .with_context(|| format!("failed to load configuration from '{}'", self.config))?;

        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Admin(args) => admin::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: connect to the configured database
pub async fn connect(config: &AppConfig) -> anyhow::Result<DatabasePool> {
    DatabasePool::connect(&config.database)
        .await
        .context("failed to connect to the database")
}

/// Helper: an admin service over `pool`
pub fn admin_service(config: &AppConfig, pool: &DatabasePool) -> AdminService {
    let uow = UnitOfWork::new(Arc::new(pool.database()), &config.unit_of_work);
    AdminService::new(
        uow,
        Arc::new(PasswordHasher::new()),
        Arc::new(PasswordValidator::new(&config.auth)),
        Arc::new(JwtEncoder::new(&config.auth)),
    )
}
