//! Codec Module
//!
//! Orchestrates Get/Set/Delete across the optional local tier and the remote
//! store, crossing the byte boundary through a [`Serializer`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::LocalCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::remote::{RemoteStore, TimeoutStore};
use crate::serializer::{JsonSerializer, Serializer};

// == Cache Item ==
/// A value to write, borrowed for the duration of [`Codec::set`].
///
/// `object: None` caches a "no value" marker, distinct from an absent key.
/// A zero `expiration` uses the local tier's default TTL and is passed to the
/// remote store unchanged.
#[derive(Debug, Clone, Copy)]
pub struct CacheItem<'a, T: ?Sized = ()> {
    pub key: &'a str,
    pub object: Option<&'a T>,
    pub expiration: Duration,
}

impl<'a, T: ?Sized> CacheItem<'a, T> {
    pub fn new(key: &'a str, object: &'a T, expiration: Duration) -> Self {
        Self {
            key,
            object: Some(object),
            expiration,
        }
    }
}

impl<'a> CacheItem<'a, ()> {
    /// An item carrying no value.
    pub fn nil(key: &'a str, expiration: Duration) -> Self {
        Self {
            key,
            object: None,
            expiration,
        }
    }
}

// == Codec Stats ==
#[derive(Debug, Default)]
struct CodecStats {
    local_hits: AtomicU64,
    remote_hits: AtomicU64,
    misses: AtomicU64,
    backfills: AtomicU64,
}

/// Point-in-time copy of the codec counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CodecStatsSnapshot {
    /// Reads served by the local tier
    pub local_hits: u64,
    /// Reads served by the remote tier
    pub remote_hits: u64,
    /// Reads that found the key in neither tier
    pub misses: u64,
    /// Remote hits copied into the local tier
    pub backfills: u64,
}

impl CodecStats {
    fn snapshot(&self) -> CodecStatsSnapshot {
        CodecStatsSnapshot {
            local_hits: self.local_hits.load(Ordering::Relaxed),
            remote_hits: self.remote_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            backfills: self.backfills.load(Ordering::Relaxed),
        }
    }
}

/// Which tier satisfied a lookup.
enum Hit {
    Local(Bytes),
    Remote(Bytes),
}

// == Codec ==
/// Cache-aside front end over a remote store and an optional local tier.
///
/// The codec holds no mutable state besides atomic counters, so one instance
/// can be shared (e.g. behind an `Arc`) by any number of tasks.
pub struct Codec<S = JsonSerializer> {
    remote: Arc<dyn RemoteStore>,
    local: Option<LocalCache>,
    serializer: S,
    /// TTL for entries copied from the remote tier, zero = local default
    backfill_ttl: Duration,
    stats: Arc<CodecStats>,
}

impl Codec<JsonSerializer> {
    /// Creates a remote-only codec using JSON encoding.
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self::with_serializer(remote, JsonSerializer)
    }

    /// Creates a JSON codec with the local tier, backfill TTL and remote
    /// deadline from `config`.
    pub fn from_config(remote: Arc<dyn RemoteStore>, config: &Config) -> Self {
        let remote: Arc<dyn RemoteStore> = match config.remote_timeout() {
            Some(timeout) => Arc::new(TimeoutStore::new(remote, timeout)),
            None => remote,
        };

        let codec = Self::new(remote).with_backfill_ttl(config.backfill_ttl());
        match LocalCache::from_config(config) {
            Some(local) => codec.with_local_cache(local),
            None => codec,
        }
    }
}

impl<S: Serializer> Codec<S> {
    pub fn with_serializer(remote: Arc<dyn RemoteStore>, serializer: S) -> Self {
        Self {
            remote,
            local: None,
            serializer,
            backfill_ttl: Duration::ZERO,
            stats: Arc::new(CodecStats::default()),
        }
    }

    /// Puts `local` in front of the remote store.
    pub fn with_local_cache(mut self, local: LocalCache) -> Self {
        self.local = Some(local);
        self
    }

    /// Sets the TTL used when backfilling the local tier after a remote hit.
    ///
    /// The original item expiration is unknown at read time, so a backfilled
    /// entry can outlive its remote copy by up to this TTL.
    pub fn with_backfill_ttl(mut self, ttl: Duration) -> Self {
        self.backfill_ttl = ttl;
        self
    }

    pub fn local_cache(&self) -> Option<&LocalCache> {
        self.local.as_ref()
    }

    pub fn stats(&self) -> CodecStatsSnapshot {
        self.stats.snapshot()
    }

    // == Set ==
    /// Encodes the item and writes it to both tiers with the same expiration.
    ///
    /// The local write happens first and is kept even when the remote write
    /// fails; the error is still reported.
    pub async fn set<T>(&self, item: &CacheItem<'_, T>) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = validate_key(item.key)?;

        let bytes = match item.object {
            Some(object) => self
                .serializer
                .encode(object)
                .map(Bytes::from)
                .map_err(|source| CacheError::Encoding {
                    key: key.to_string(),
                    source: Box::new(source),
                })?,
            None => Bytes::new(),
        };

        if let Some(local) = &self.local {
            local.set(key, bytes.clone(), item.expiration).await;
        }

        self.remote
            .set(key, bytes, item.expiration)
            .await
            .map_err(|source| {
                warn!(store = self.remote.name(), key, error = %source, "remote write failed");
                CacheError::RemoteWrite {
                    key: key.to_string(),
                    source,
                }
            })?;

        debug!(key, expiration = ?item.expiration, "cached item");
        Ok(())
    }

    // == Get ==
    /// Reads `key` into `target`.
    ///
    /// A cached "no value" succeeds and leaves `target` untouched. Returns
    /// [`CacheError::Miss`] when neither tier holds the key.
    pub async fn get<T>(&self, key: &str, target: &mut T) -> Result<()>
    where
        T: DeserializeOwned,
    {
        if let Some(value) = self.get_value::<T>(key).await? {
            *target = value;
        }
        Ok(())
    }

    /// Reads `key`, returning `Ok(None)` for a cached "no value".
    pub async fn get_value<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let key = validate_key(key)?;

        match self.lookup(key).await? {
            Hit::Local(bytes) => self.decode(key, &bytes),
            Hit::Remote(bytes) => {
                let value = self.decode(key, &bytes)?;
                self.backfill(key, bytes).await;
                Ok(value)
            }
        }
    }

    // == Delete ==
    /// Removes `key` from both tiers.
    ///
    /// The local copy is dropped even if the remote delete then fails.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let key = validate_key(key)?;

        if let Some(local) = &self.local {
            local.delete(key).await;
        }

        self.remote.delete(key).await.map_err(|source| {
            warn!(store = self.remote.name(), key, error = %source, "remote delete failed");
            CacheError::RemoteDelete {
                key: key.to_string(),
                source,
            }
        })?;

        debug!(key, "deleted item");
        Ok(())
    }

    // == Internal Helpers ==
    async fn lookup(&self, key: &str) -> Result<Hit> {
        if let Some(local) = &self.local {
            if let Some(bytes) = local.get(key).await {
                self.stats.local_hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "local hit");
                return Ok(Hit::Local(bytes));
            }
        }

        let fetched = self.remote.get(key).await.map_err(|source| {
            warn!(store = self.remote.name(), key, error = %source, "remote read failed");
            CacheError::RemoteRead {
                key: key.to_string(),
                source,
            }
        })?;

        match fetched {
            Some(bytes) => {
                self.stats.remote_hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, store = self.remote.name(), "remote hit");
                Ok(Hit::Remote(bytes))
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key, "cache miss");
                Err(CacheError::Miss(key.to_string()))
            }
        }
    }

    fn decode<T>(&self, key: &str, bytes: &[u8]) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        if bytes.is_empty() {
            return Ok(None);
        }

        self.serializer
            .decode(bytes)
            .map(Some)
            .map_err(|source| CacheError::Decoding {
                key: key.to_string(),
                source: Box::new(source),
            })
    }

    async fn backfill(&self, key: &str, bytes: Bytes) {
        if let Some(local) = &self.local {
            local.set(key, bytes, self.backfill_ttl).await;
            self.stats.backfills.fetch_add(1, Ordering::Relaxed);
            debug!(key, ttl = ?self.backfill_ttl, "backfilled local tier");
        }
    }
}

impl<S: Clone> Clone for Codec<S> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            local: self.local.clone(),
            serializer: self.serializer.clone(),
            backfill_ttl: self.backfill_ttl,
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<S> std::fmt::Debug for Codec<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("remote", &self.remote.name())
            .field("local", &self.local.is_some())
            .field("backfill_ttl", &self.backfill_ttl)
            .finish()
    }
}

fn validate_key(key: &str) -> Result<&str> {
    if key.is_empty() {
        Err(CacheError::InvalidKey)
    } else {
        Ok(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::remote::MemoryStore;
    use async_trait::async_trait;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Object {
        text: String,
        num: i64,
    }

    fn object() -> Object {
        Object {
            text: "mystring".to_string(),
            num: 42,
        }
    }

    fn layered() -> (Codec, Arc<MemoryStore>, LocalCache) {
        let remote = Arc::new(MemoryStore::new());
        let local = LocalCache::new(Duration::from_secs(60), 100);
        let codec = Codec::new(remote.clone()).with_local_cache(local.clone());
        (codec, remote, local)
    }

    #[tokio::test]
    async fn test_set_writes_both_tiers() {
        let (codec, remote, local) = layered();

        codec
            .set(&CacheItem::new("k", &object(), Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(local.contains("k").await);
        assert!(remote.get("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_nil_item_is_stored_as_empty_bytes() {
        let (codec, remote, local) = layered();

        codec.set(&CacheItem::nil("k", Duration::ZERO)).await.unwrap();

        assert_eq!(local.get("k").await, Some(Bytes::new()));
        assert_eq!(remote.get("k").await.unwrap(), Some(Bytes::new()));
    }

    #[tokio::test]
    async fn test_get_value_reports_nil_as_none() {
        let (codec, _, _) = layered();

        codec.set(&CacheItem::nil("k", Duration::ZERO)).await.unwrap();

        let value: Option<Object> = codec.get_value("k").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_local_hit_skips_remote() {
        let (codec, remote, _) = layered();

        codec
            .set(&CacheItem::new("k", &object(), Duration::from_secs(60)))
            .await
            .unwrap();
        // Remote copy gone, local copy still serves reads
        remote.delete("k").await.unwrap();

        let value: Option<Object> = codec.get_value("k").await.unwrap();
        assert_eq!(value, Some(object()));
        assert_eq!(codec.stats().local_hits, 1);
        assert_eq!(codec.stats().remote_hits, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_hit_backfills_with_backfill_ttl() {
        let remote = Arc::new(MemoryStore::new());
        let local = LocalCache::new(Duration::from_secs(60), 100);
        let codec = Codec::new(remote.clone())
            .with_local_cache(local.clone())
            .with_backfill_ttl(Duration::from_secs(40));

        let bytes = JsonSerializer.encode(&object()).unwrap();
        remote.set("k", Bytes::from(bytes), Duration::ZERO).await.unwrap();

        let mut target = Object {
            text: String::new(),
            num: 0,
        };
        codec.get("k", &mut target).await.unwrap();

        assert_eq!(target, object());
        assert!(local.contains("k").await);
        assert_eq!(codec.stats().backfills, 1);

        tokio::time::advance(Duration::from_secs(39)).await;
        assert!(local.contains("k").await);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!local.contains("k").await);
    }

    #[tokio::test]
    async fn test_decode_failure_is_surfaced_and_not_backfilled() {
        let (codec, remote, local) = layered();

        remote
            .set("bad", Bytes::from_static(b"{not json"), Duration::ZERO)
            .await
            .unwrap();

        let result: Result<Option<Object>> = codec.get_value("bad").await;

        assert!(matches!(result, Err(CacheError::Decoding { ref key, .. }) if key == "bad"));
        assert!(!local.contains("bad").await);
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected() {
        let (codec, _, _) = layered();

        assert!(matches!(
            codec.set(&CacheItem::nil("", Duration::ZERO)).await,
            Err(CacheError::InvalidKey)
        ));
        assert!(matches!(
            codec.get_value::<Object>("").await,
            Err(CacheError::InvalidKey)
        ));
        assert!(matches!(codec.delete("").await, Err(CacheError::InvalidKey)));
    }

    #[tokio::test]
    async fn test_from_config_respects_local_toggle() {
        let remote: Arc<dyn RemoteStore> = Arc::new(MemoryStore::new());

        let mut config = Config::default();
        assert!(Codec::from_config(remote.clone(), &config).local_cache().is_some());

        config.local_cache_enabled = false;
        assert!(Codec::from_config(remote, &config).local_cache().is_none());
    }

    /// Remote whose calls never complete.
    struct HangingStore;

    #[async_trait]
    impl RemoteStore for HangingStore {
        fn name(&self) -> &'static str {
            "hanging"
        }

        async fn set(&self, _: &str, _: Bytes, _: Duration) -> std::result::Result<(), RemoteError> {
            std::future::pending().await
        }

        async fn get(&self, _: &str) -> std::result::Result<Option<Bytes>, RemoteError> {
            std::future::pending().await
        }

        async fn delete(&self, _: &str) -> std::result::Result<(), RemoteError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_config_bounds_remote_calls() {
        let config = Config {
            local_cache_enabled: false,
            remote_timeout_ms: 20,
            ..Config::default()
        };
        let codec = Codec::from_config(Arc::new(HangingStore), &config);

        let read = codec.get_value::<u32>("k").await;
        assert!(matches!(
            read,
            Err(CacheError::RemoteRead { source: RemoteError::Timeout(d), .. }) if d == Duration::from_millis(20)
        ));

        let write = codec.set(&CacheItem::new("k", &1u32, Duration::ZERO)).await;
        assert!(matches!(
            write,
            Err(CacheError::RemoteWrite { source: RemoteError::Timeout(_), .. })
        ));

        let delete = codec.delete("k").await;
        assert!(matches!(
            delete,
            Err(CacheError::RemoteDelete { source: RemoteError::Timeout(_), .. })
        ));
    }

    #[tokio::test]
    async fn test_clones_share_stats() {
        let (codec, _, _) = layered();
        let clone = codec.clone();

        let _ = clone.get_value::<Object>("missing").await;

        assert_eq!(codec.stats().misses, 1);
    }
}
