//! Configuration Module
//!
//! Handles loading cache layer settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Cache layer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether a local tier sits in front of the remote store
    pub local_cache_enabled: bool,
    /// Maximum number of entries the local tier can hold
    pub local_max_entries: usize,
    /// Default local TTL in seconds, used when an item carries no expiration
    pub local_ttl_secs: u64,
    /// TTL in seconds for entries backfilled from the remote tier, 0 = local default
    pub backfill_ttl_secs: u64,
    /// Background sweep interval in seconds, 0 = lazy expiration only
    pub sweep_interval_secs: u64,
    /// Deadline in milliseconds for a single remote operation, 0 = no deadline
    pub remote_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LOCAL_CACHE_ENABLED` - Enable the local tier: true/false, 1/0, yes/no, on/off (default: true)
    /// - `LOCAL_CACHE_MAX_ENTRIES` - Local tier capacity (default: 1000)
    /// - `LOCAL_CACHE_TTL_SECS` - Local default TTL (default: 60)
    /// - `BACKFILL_TTL_SECS` - TTL for backfilled entries (default: 0)
    /// - `SWEEP_INTERVAL_SECS` - Expired entry sweep interval (default: 0)
    /// - `REMOTE_TIMEOUT_MS` - Remote operation deadline, 0 disables it (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            local_cache_enabled: env_flag_or("LOCAL_CACHE_ENABLED", defaults.local_cache_enabled),
            local_max_entries: env_or("LOCAL_CACHE_MAX_ENTRIES", defaults.local_max_entries),
            local_ttl_secs: env_or("LOCAL_CACHE_TTL_SECS", defaults.local_ttl_secs),
            backfill_ttl_secs: env_or("BACKFILL_TTL_SECS", defaults.backfill_ttl_secs),
            sweep_interval_secs: env_or("SWEEP_INTERVAL_SECS", defaults.sweep_interval_secs),
            remote_timeout_ms: env_or("REMOTE_TIMEOUT_MS", defaults.remote_timeout_ms),
        }
    }

    pub fn local_ttl(&self) -> Duration {
        Duration::from_secs(self.local_ttl_secs)
    }

    pub fn backfill_ttl(&self) -> Duration {
        Duration::from_secs(self.backfill_ttl_secs)
    }

    /// Sweep interval, or None when only lazy expiration is wanted.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }

    /// Per-operation remote deadline, or None when calls are unbounded.
    pub fn remote_timeout(&self) -> Option<Duration> {
        (self.remote_timeout_ms > 0).then(|| Duration::from_millis(self.remote_timeout_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_cache_enabled: true,
            local_max_entries: 1000,
            local_ttl_secs: 60,
            backfill_ttl_secs: 0,
            sweep_interval_secs: 0,
            remote_timeout_ms: 1000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag_or(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
