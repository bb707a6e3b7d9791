//! Redis connection for the TTL store.

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use mallhub_core::config::cache::RedisCacheConfig;
use mallhub_core::config::redact_credentials;
use mallhub_core::error::{AppError, ErrorKind};
use mallhub_core::result::AppResult;

/// Reconnecting Redis connection plus the namespace all MallHub keys share.
#[derive(Debug, Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisClient {
    /// Connect to the server named in the `[cache.redis]` section.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(
            url = %redact_credentials(&config.url),
            key_prefix = %config.key_prefix,
            "Connecting TTL store to Redis"
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "invalid Redis URL", e)
        })?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Redis is unreachable", e)
        })?;

        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// A handle on the shared connection; cheap to clone per command.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// `key` inside the configured namespace.
    pub fn key(&self, key: &str) -> String {
        namespaced(&self.key_prefix, key)
    }
}

fn namespaced(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_share_the_configured_namespace() {
        let prefix = RedisCacheConfig::default().key_prefix;
        assert_eq!(namespaced(&prefix, "reset:sms:1380"), "mallhub:reset:sms:1380");
        assert_eq!(namespaced("", "reset:abc"), "reset:abc");
    }
}
