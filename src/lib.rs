//! tiercache - A two-tier cache-aside layer
//!
//! A bounded in-process cache with TTL expiration and LRU eviction sits in
//! front of a shared remote store. Values cross into bytes through a pluggable
//! serializer; callers see one Get/Set/Delete contract.
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tiercache::{CacheItem, Codec, LocalCache, MemoryStore};
//!
//! let codec = Codec::new(Arc::new(MemoryStore::new()))
//!     .with_local_cache(LocalCache::new(Duration::from_secs(60), 1000));
//!
//! codec.set(&CacheItem::new("greeting", "hello", Duration::from_secs(3600))).await?;
//! let value: Option<String> = codec.get_value("greeting").await?;
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod remote;
pub mod serializer;
pub mod tasks;

pub use cache::LocalCache;
pub use codec::{CacheItem, Codec, CodecStatsSnapshot};
pub use config::Config;
pub use error::{CacheError, RemoteError, Result};
pub use remote::{MemoryStore, RemoteStore, TimeoutStore};
pub use serializer::{JsonSerializer, Serializer};
pub use tasks::spawn_sweep_task;
