//! Redis-backed remote store.

use std::time::Duration;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, RedisError};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use crate::error::RemoteError;
use crate::remote::RemoteStore;

// == Redis Store ==
/// Remote tier over a reconnecting Redis connection.
///
/// Values are written with `PSETEX` when an expiration is given and plain
/// `SET` otherwise.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to the server at `url`, e.g. `redis://127.0.0.1:6379`.
    pub async fn connect(url: &str) -> Result<Self, RemoteError> {
        let client = ::redis::Client::open(url).map_err(map_redis_error)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        info!(url, "connected to redis remote tier");
        Ok(Self { conn })
    }

    pub fn from_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl RemoteStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), RemoteError> {
        let mut conn = self.conn.clone();
        if ttl.is_zero() {
            conn.set::<_, _, ()>(key, value.as_ref())
                .await
                .map_err(map_redis_error)
        } else {
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
            conn.pset_ex::<_, _, ()>(key, value.as_ref(), millis)
                .await
                .map_err(map_redis_error)
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, RemoteError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(value.map(Bytes::from))
    }

    async fn delete(&self, key: &str) -> Result<(), RemoteError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(map_redis_error)
    }
}

// Client-side timeouts carry no configured deadline, so they report as
// Unavailable. RemoteError::Timeout is reserved for TimeoutStore.
fn map_redis_error(err: RedisError) -> RemoteError {
    if err.is_io_error()
        || err.is_timeout()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
    {
        RemoteError::Unavailable(err.to_string())
    } else {
        RemoteError::Backend(Box::new(err))
    }
}
