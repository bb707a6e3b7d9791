//! In-memory TTL store using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};

use mallhub_core::config::cache::MemoryCacheConfig;
use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::traits::TtlStore;

/// A stored value together with its own lifetime.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
    /// Counters keep the expiry they were created with.
    keep_expiry: bool,
}

impl Entry {
    fn plain(value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            value: value.into(),
            ttl,
            keep_expiry: false,
        }
    }

    fn counter(n: i64, ttl: Duration) -> Self {
        Self {
            value: n.to_string(),
            ttl,
            keep_expiry: true,
        }
    }
}

/// Expires every entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        if entry.keep_expiry {
            duration_until_expiry
        } else {
            Some(entry.ttl)
        }
    }
}

/// In-memory TTL store backed by moka.
#[derive(Debug, Clone)]
pub struct MemoryTtlStore {
    cache: Cache<String, Entry>,
}

impl MemoryTtlStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl Default for MemoryTtlStore {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl TtlStore for MemoryTtlStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.cache
            .insert(key.to_string(), Entry::plain(value, ttl))
            .await;
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let fresh = Entry::plain(value, ttl);
        let result = self
            .cache
            .entry(key.to_string())
            .and_compute_with(|current| {
                let op = match current {
                    Some(_) => Op::Nop,
                    None => Op::Put(fresh),
                };
                std::future::ready(op)
            })
            .await;
        Ok(matches!(result, CompResult::Inserted(_)))
    }

    async fn incr(&self, key: &str, ttl: Duration) -> AppResult<i64> {
        let result = self
            .cache
            .entry(key.to_string())
            .and_compute_with(|current| {
                let op = match current {
                    None => Op::Put(Entry::counter(1, ttl)),
                    Some(existing) => match existing.value().value.parse::<i64>() {
                        Ok(n) => Op::Put(Entry::counter(n.saturating_add(1), ttl)),
                        Err(_) => Op::Nop,
                    },
                };
                std::future::ready(op)
            })
            .await;

        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => entry
                .value()
                .value
                .parse()
                .map_err(|_| AppError::cache(format!("counter '{key}' is corrupt"))),
            _ => Err(AppError::cache(format!("value at '{key}' is not a counter"))),
        }
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
