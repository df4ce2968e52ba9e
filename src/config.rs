//! Configuration Module
//!
//! Handles loading active-hours and invalidation settings from environment variables.

use std::env;
use std::str::FromStr;

use crate::error::Result;
use crate::invalidation::DEFAULT_CHUNK_SIZE;
use crate::keys::ActiveHours;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// First hour (0-23) of the active window
    pub active_start_hour: u32,
    /// Last hour (0-23) of the active window, inclusive at `hh:00:00`
    pub active_end_hour: u32,
    /// Keys per bulk-unlink call when purging
    pub delete_chunk_size: usize,
    /// Redis connection URL, if a Redis store is used
    pub redis_url: Option<String>,
    /// Prefix prepended to every key sent to Redis
    pub key_prefix: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `HAS_CACHE_ACTIVE_HOUR_START` - Active window start hour (default: 8)
    /// - `HAS_CACHE_ACTIVE_HOUR_END` - Active window end hour (default: 20)
    /// - `HAS_CACHE_DELETE_CHUNK_SIZE` - Keys per unlink call (default: 1000)
    /// - `REDIS_URL` - Redis connection URL (default: unset)
    /// - `HAS_CACHE_PREFIX` - Redis key prefix (default: empty)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            active_start_hour: parse_var("HAS_CACHE_ACTIVE_HOUR_START")
                .unwrap_or(defaults.active_start_hour),
            active_end_hour: parse_var("HAS_CACHE_ACTIVE_HOUR_END")
                .unwrap_or(defaults.active_end_hour),
            delete_chunk_size: parse_var("HAS_CACHE_DELETE_CHUNK_SIZE")
                .filter(|size: &usize| *size > 0)
                .unwrap_or(defaults.delete_chunk_size),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            key_prefix: env::var("HAS_CACHE_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }

    /// Validates the configured hours into an [`ActiveHours`] window.
    pub fn active_hours(&self) -> Result<ActiveHours> {
        ActiveHours::new(self.active_start_hour, self.active_end_hour)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_start_hour: 8,
            active_end_hour: 20,
            delete_chunk_size: DEFAULT_CHUNK_SIZE,
            redis_url: None,
            key_prefix: String::new(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
