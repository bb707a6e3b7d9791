//! Database migration command.

use anyhow::Context;

use mallhub_core::config::AppConfig;
use mallhub_database::migration::run_migrations;

use crate::output;

/// Apply every pending migration
pub async fn execute(config: &AppConfig) -> anyhow::Result<()> {
    let pool = super::connect(config).await?;

    println!("Running database migrations...");
    let result = run_migrations(pool.pool()).await.context("migration failed");
    pool.close().await;
    result?;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
