//! Expired Entry Sweep Task
//!
//! Periodically reclaims memory held by expired local entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LocalCache;
use crate::config::Config;

/// Spawns a task that purges expired entries from `cache` every `interval`.
///
/// The returned handle can be aborted to stop the sweep, e.g. on shutdown.
///
/// # Example
/// ```ignore
/// let cache = LocalCache::new(Duration::from_secs(60), 1000);
/// let sweeper = spawn_sweep_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweep_task(cache: LocalCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval = ?interval, "starting local cache sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                info!(removed, "sweep: purged expired entries");
            } else {
                debug!("sweep: no expired entries found");
            }
        }
    })
}

/// Spawns the sweep task if `config` asks for one.
pub fn spawn_sweep_task_from_config(cache: &LocalCache, config: &Config) -> Option<JoinHandle<()>> {
    config
        .sweep_interval()
        .map(|interval| spawn_sweep_task(cache.clone(), interval))
}
