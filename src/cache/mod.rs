//! Cache Module
//!
//! The local tier: in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod local;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use local::LocalCache;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::LruStore;
