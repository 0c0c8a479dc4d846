//! In-process remote store, used for tests and single-node deployments.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::RemoteError;
use crate::remote::RemoteStore;

#[derive(Debug)]
struct StoredValue {
    value: Bytes,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires| now >= expires)
    }
}

// == Memory Store ==
/// Unbounded map honouring per-key expiration, checked lazily on read.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, expired ones included until they are read.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), RemoteError> {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Instant::now().checked_add(ttl)
        };

        self.entries
            .lock()
            .await
            .insert(key.to_string(), StoredValue { value, expires_at });
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, RemoteError> {
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(stored) if stored.is_expired(Instant::now()) => {
                entries.remove(key);
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.value.clone())),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), RemoteError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();

        store
            .set("k", Bytes::from_static(b"v"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(Bytes::from_static(b"v")));
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_expiration() {
        let store = MemoryStore::new();

        store
            .set("short", Bytes::from_static(b"v"), Duration::from_secs(30))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(29)).await;
        assert!(store.get("short").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;

        assert_eq!(store.get("short").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_zero_ttl_never_expires() {
        let store = MemoryStore::new();

        store.set("k", Bytes::new(), Duration::ZERO).await.unwrap();
        tokio::time::advance(Duration::from_secs(3600)).await;

        assert_eq!(store.get("k").await.unwrap(), Some(Bytes::new()));
    }

    #[tokio::test]
    async fn test_memory_store_delete_missing_key() {
        let store = MemoryStore::new();
        assert!(store.delete("missing").await.is_ok());
        assert_eq!(store.len().await, 0);
    }
}
