//! Start the MallHub server.

use anyhow::Context;
use clap::Args;

use mallhub_core::config::AppConfig;
use mallhub_database::migration::run_migrations;

use crate::output;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip applying migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    println!("Starting MallHub server...");
    output::print_kv("Host", &config.server.host);
    output::print_kv("Port", &config.server.port.to_string());

    let pool = super::connect(&config).await?;

    if !args.no_migrate {
        run_migrations(pool.pool()).await.context("migration failed")?;
        output::print_success("Migrations applied.");
    }

    mallhub_api::run_server(config, pool)
        .await
        .context("server stopped with an error")
}
