//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror. Local tier operations never
//! fail, so every variant here comes from key validation, the serializer, or the
//! remote store.

use std::time::Duration;

use thiserror::Error;

/// Boxed error used to carry serializer and backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Cache Error Enum ==
/// Unified error type returned by [`Codec`](crate::Codec).
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key was empty
    #[error("Invalid key: keys must be non-empty")]
    InvalidKey,

    /// Neither tier holds the key
    #[error("Cache miss: {0}")]
    Miss(String),

    /// Value could not be serialized
    #[error("Failed to encode value for key {key}: {source}")]
    Encoding {
        key: String,
        #[source]
        source: BoxError,
    },

    /// Stored bytes could not be deserialized
    #[error("Failed to decode value for key {key}: {source}")]
    Decoding {
        key: String,
        #[source]
        source: BoxError,
    },

    /// Remote get failed for a reason other than a clean miss
    #[error("Remote read failed for key {key}: {source}")]
    RemoteRead {
        key: String,
        #[source]
        source: RemoteError,
    },

    /// Remote set failed
    #[error("Remote write failed for key {key}: {source}")]
    RemoteWrite {
        key: String,
        #[source]
        source: RemoteError,
    },

    /// Remote delete failed
    #[error("Remote delete failed for key {key}: {source}")]
    RemoteDelete {
        key: String,
        #[source]
        source: RemoteError,
    },
}

impl CacheError {
    /// Returns true for the authoritative "no value exists" result.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss(_))
    }

    /// Returns true if the remote tier failed.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CacheError::RemoteRead { .. }
                | CacheError::RemoteWrite { .. }
                | CacheError::RemoteDelete { .. }
        )
    }
}

// == Remote Error Enum ==
/// Failure reported by a [`RemoteStore`](crate::remote::RemoteStore).
///
/// A clean miss is not an error; stores report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The operation did not complete within its deadline
    #[error("Remote operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store could not be reached
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure
    #[error("Remote backend error: {0}")]
    Backend(#[source] BoxError),
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_is_distinguishable() {
        let miss = CacheError::Miss("k".to_string());
        assert!(miss.is_miss());
        assert!(!miss.is_remote());
        assert_eq!(miss.to_string(), "Cache miss: k");
    }

    #[test]
    fn test_remote_errors_are_not_misses() {
        let err = CacheError::RemoteRead {
            key: "k".to_string(),
            source: RemoteError::Timeout(Duration::from_millis(5)),
        };
        assert!(err.is_remote());
        assert!(!err.is_miss());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_source_chain_is_preserved() {
        use std::error::Error as _;

        let err = CacheError::RemoteDelete {
            key: "k".to_string(),
            source: RemoteError::Unavailable("connection refused".to_string()),
        };
        let source = err.source().expect("source should be set");
        assert_eq!(source.to_string(), "Remote store unavailable: connection refused");
    }
}
