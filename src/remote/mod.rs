//! Remote Tier Module
//!
//! The shared, networked store behind the local tier. The codec only needs
//! set-with-expiration, get and delete; transport, pooling and topology belong
//! to the implementation.

mod memory;
#[cfg(feature = "redis")]
mod redis_store;
mod timeout;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::RemoteError;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use timeout::TimeoutStore;

// == Remote Store Trait ==
/// Async key-value store with per-key expiration.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// A short name for logs, e.g. "memory" or "redis".
    fn name(&self) -> &'static str;

    /// Stores `value` under `key`. A zero `ttl` means no expiration.
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), RemoteError>;

    /// Fetches `key`. A missing key is `Ok(None)`, never an error.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, RemoteError>;

    /// Removes `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), RemoteError>;
}

#[async_trait]
impl<R: RemoteStore + ?Sized> RemoteStore for Arc<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), RemoteError> {
        (**self).set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, RemoteError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), RemoteError> {
        (**self).delete(key).await
    }
}
