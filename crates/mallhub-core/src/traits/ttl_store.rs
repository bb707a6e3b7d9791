//! TTL key/value store used for one-time codes.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for short-lived key/value backends (Redis or in-memory).
///
/// Entries vanish once their TTL elapses; `get` never returns an expired
/// value. Implementations handle key prefixing themselves.
#[async_trait]
pub trait TtlStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Set a value only if the key is absent. Returns `true` if it was set.
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool>;

    /// Atomically increment a counter, creating it at `1`. `ttl` applies when
    /// the counter is created; later increments keep the original expiry.
    async fn incr(&self, key: &str, ttl: Duration) -> AppResult<i64>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a live key exists.
    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
