//! TTL store manager that dispatches to the configured backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use mallhub_core::config::cache::CacheConfig;
use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::traits::TtlStore;

/// Wraps the TTL store selected by configuration.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn TtlStore>,
}

impl CacheManager {
    /// Create a new manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn TtlStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis TTL store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisTtlStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory TTL store");
                Arc::new(crate::memory::MemoryTtlStore::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a manager from an existing store (for testing).
    pub fn from_provider(provider: Arc<dyn TtlStore>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl TtlStore for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        self.inner.set_nx(key, value, ttl).await
    }

    async fn incr(&self, key: &str, ttl: Duration) -> AppResult<i64> {
        self.inner.incr(key, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
