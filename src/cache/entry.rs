//! Cache Entry Module
//!
//! Defines the structure for individual local cache entries with TTL support.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single local cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes (empty = cached "no value" marker)
    pub value: Bytes,
    /// Expiration instant, None = the TTL overflowed the clock and never expires
    pub expires_at: Option<Instant>,
    /// Position of the key in the recency list
    pub(crate) slot: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    pub fn new(value: Bytes, ttl: Duration, slot: usize) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
            slot,
        }
    }

    // == Refresh ==
    /// Replaces value and expiration in place, keeping the recency slot.
    pub fn refresh(&mut self, value: Bytes, ttl: Duration) {
        self.value = value;
        self.expires_at = Instant::now().checked_add(ttl);
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new(Bytes::from_static(b"test_value"), Duration::from_secs(60), 0);

        assert_eq!(entry.value, Bytes::from_static(b"test_value"));
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = CacheEntry::new(Bytes::from_static(b"v"), Duration::from_secs(5), 0);

        advance(Duration::from_millis(4999)).await;
        assert!(!entry.is_expired());

        advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_overflowing_ttl_never_expires() {
        let entry = CacheEntry::new(Bytes::new(), Duration::MAX, 0);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_replaces_value_and_keeps_slot() {
        let mut entry = CacheEntry::new(Bytes::from_static(b"old"), Duration::from_secs(1), 7);

        advance(Duration::from_secs(2)).await;
        assert!(entry.is_expired());

        entry.refresh(Bytes::from_static(b"new"), Duration::from_secs(60));

        assert_eq!(entry.value, Bytes::from_static(b"new"));
        assert_eq!(entry.slot, 7);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: Bytes::new(),
            expires_at: Some(now),
            slot: 0,
        };

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
    }
}
