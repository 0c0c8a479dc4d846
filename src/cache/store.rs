//! LRU Store Module
//!
//! Single-threaded eviction engine combining HashMap storage with LRU tracking
//! and lazy TTL expiration. [`LocalCache`](crate::cache::LocalCache) wraps it
//! for shared use.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == LRU Store ==
/// Bounded key→bytes storage with LRU eviction and TTL support.
///
/// No operation fails: eviction is silent and expired entries are dropped the
/// first time they are looked at.
#[derive(Debug)]
pub struct LruStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL applied when a caller passes a zero TTL
    default_ttl: Duration,
}

impl LruStore {
    // == Constructor ==
    /// Creates a new LruStore with the given default TTL and capacity.
    ///
    /// A capacity of zero stores nothing.
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry for the key.
    ///
    /// The key becomes the most recently used. A zero `ttl` means the default
    /// TTL. Only inserting a new key can trigger eviction.
    pub fn set(&mut self, key: &str, value: Bytes, ttl: Duration) {
        let ttl = self.effective_ttl(ttl);

        if let Some(entry) = self.entries.get_mut(key) {
            entry.refresh(value, ttl);
            let slot = entry.slot;
            self.lru.touch(slot);
            return;
        }

        let slot = self.lru.insert(key.to_string());
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl, slot));

        while self.entries.len() > self.max_entries {
            let Some(evicted) = self.lru.evict_oldest() else {
                break;
            };
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, "evicted least recently used entry");
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None if the key is absent or expired. Expired entries are
    /// removed and counted as misses. A hit makes the key most recently used.
    pub fn get(&mut self, key: &str) -> Option<Bytes> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired() {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        let value = entry.value.clone();
        let slot = entry.slot;
        self.lru.touch(slot);
        self.stats.record_hit();
        Some(value)
    }

    // == Contains ==
    /// Checks for a live entry without changing its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Delete ==
    /// Removes an entry by key, returning whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Clear ==
    /// Drops every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Keys from most to least recently used, expired ones included.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lru.iter().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Internal Helpers ==
    fn effective_ttl(&self, ttl: Duration) -> Duration {
        if ttl.is_zero() {
            self.default_ttl
        } else {
            ttl
        }
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(entry.slot);
        self.stats.set_total_entries(self.entries.len());
        Some(entry)
    }

    /// Map and recency list agree on membership and size.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.entries.len() == self.lru.len()
            && self.entries.len() <= self.max_entries
            && self.lru.iter().all(|key| self.entries.contains_key(key))
    }
}
