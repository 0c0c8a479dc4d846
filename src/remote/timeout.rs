//! Deadline wrapper for remote stores.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::warn;

use crate::error::RemoteError;
use crate::remote::RemoteStore;

// == Timeout Store ==
/// Bounds every call on the wrapped store, reporting [`RemoteError::Timeout`]
/// instead of hanging.
#[derive(Debug)]
pub struct TimeoutStore<R> {
    inner: R,
    timeout: Duration,
}

impl<R: RemoteStore> TimeoutStore<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, op: &'static str, key: &str, fut: F) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(store = self.inner.name(), op, key, timeout = ?self.timeout, "remote operation timed out");
                Err(RemoteError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl<R: RemoteStore> RemoteStore for TimeoutStore<R> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), RemoteError> {
        self.bounded("set", key, self.inner.set(key, value, ttl)).await
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, RemoteError> {
        self.bounded("get", key, self.inner.get(key)).await
    }

    async fn delete(&self, key: &str) -> Result<(), RemoteError> {
        self.bounded("delete", key, self.inner.delete(key)).await
    }
}
