//! Redis TTL store implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use mallhub_core::error::{AppError, ErrorKind};
use mallhub_core::result::AppResult;
use mallhub_core::traits::TtlStore;

use super::client::RedisClient;

/// Redis-backed TTL store.
#[derive(Debug, Clone)]
pub struct RedisTtlStore {
    client: RedisClient,
}

impl RedisTtlStore {
    /// Wrap a connected client.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl TtlStore for RedisTtlStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.key(key);
        let mut conn = self.client.connection();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.key(key);
        let mut conn = self.client.connection();
        // SETEX rejects 0.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(&full_key, value, seconds)
            .await
            .map_err(Self::map_err)?;
        debug!(key = %full_key, ttl_seconds = seconds, "Stored TTL entry");
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.key(key);
        let mut conn = self.client.connection();

        // SET key value EX ttl NX
        let result: Option<String> = redis::cmd("SET")
            .arg(&full_key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(result.is_some())
    }

    async fn incr(&self, key: &str, ttl: Duration) -> AppResult<i64> {
        let full_key = self.client.key(key);
        let mut conn = self.client.connection();
        let count: i64 = conn.incr(&full_key, 1i64).await.map_err(Self::map_err)?;
        if count == 1 {
            let seconds = i64::try_from(ttl.as_secs().max(1)).unwrap_or(i64::MAX);
            let _: bool = conn
                .expire(&full_key, seconds)
                .await
                .map_err(Self::map_err)?;
        }
        Ok(count)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.key(key);
        let mut conn = self.client.connection();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.key(key);
        let mut conn = self.client.connection();
        let result: bool = conn.exists(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.connection();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
