//! Postgres pool behind the MallHub store.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use mallhub_core::config::{DatabaseConfig, redact_credentials};
use mallhub_core::error::{AppError, ErrorKind};
use mallhub_core::result::AppResult;

use crate::repositories::PgDatabase;

/// Shared Postgres pool. Migrations run against [`DatabasePool::pool`];
/// services get a [`PgDatabase`] from [`DatabasePool::database`].
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool sized and timed by the `[database]` section.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            url = %redact_credentials(&config.url),
            max_connections = config.max_connections,
            "Opening MallHub database pool"
        );

        let pool = pool_options(config)
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("cannot reach the MallHub database: {e}"),
                    e,
                )
            })?;

        Ok(Self { pool })
    }

    /// The raw sqlx pool, for migrations.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// A store handle sharing this pool.
    pub fn database(&self) -> PgDatabase {
        PgDatabase::new(self.pool.clone())
    }

    /// Wait for in-flight transactions, then close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("MallHub database pool closed");
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_options_follow_config() {
        let config = DatabaseConfig {
            max_connections: 7,
            min_connections: 2,
            connect_timeout_seconds: 3,
            idle_timeout_seconds: 40,
            ..DatabaseConfig::default()
        };
        let options = pool_options(&config);
        assert_eq!(options.get_max_connections(), 7);
        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(40)));
    }
}
