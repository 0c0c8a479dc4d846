//! Local Cache Handle
//!
//! Thread-safe, cloneable handle over an [`LruStore`]. One global lock guards
//! the map and recency list together, so every operation is linearizable.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::cache::{CacheStats, LruStore};
use crate::config::Config;

// == Local Cache ==
/// In-process tier: bounded capacity, TTL-aware, LRU eviction.
///
/// Cloning the handle shares the same underlying store.
#[derive(Debug, Clone)]
pub struct LocalCache {
    inner: Arc<Mutex<LruStore>>,
}

impl LocalCache {
    /// Creates a local cache with the given default TTL and capacity.
    pub fn new(default_ttl: Duration, capacity: usize) -> Self {
        Self::from_store(LruStore::new(default_ttl, capacity))
    }

    /// Wraps an existing store.
    pub fn from_store(store: LruStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Creates the local tier described by the configuration, if enabled.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .local_cache_enabled
            .then(|| Self::new(config.local_ttl(), config.local_max_entries))
    }

    /// Inserts or overwrites `key`. A zero `ttl` uses the default TTL.
    pub async fn set(&self, key: &str, value: Bytes, ttl: Duration) {
        self.inner.lock().await.set(key, value, ttl);
    }

    /// Returns the live value for `key`, refreshing its recency.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.inner.lock().await.get(key)
    }

    /// Removes `key`; returns whether it was present.
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.lock().await.delete(key)
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.lock().await.contains(key)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    /// Drops expired entries now rather than on their next access.
    pub async fn purge_expired(&self) -> usize {
        self.inner.lock().await.purge_expired()
    }

    pub async fn capacity(&self) -> usize {
        self.inner.lock().await.capacity()
    }

    pub async fn default_ttl(&self) -> Duration {
        self.inner.lock().await.default_ttl()
    }

    #[cfg(test)]
    pub(crate) async fn is_consistent(&self) -> bool {
        self.inner.lock().await.is_consistent()
    }
}
