//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::diagnostics::Environment;
use crate::error::{CacheError, Result};

/// Default number of entries a cache holds.
pub const DEFAULT_CAPACITY: usize = 10;

/// Default TTL in milliseconds applied by `insert`.
pub const DEFAULT_TTL_MS: u64 = 60_000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Default TTL in milliseconds for entries stored without an explicit TTL
    pub default_ttl_ms: u64,
    /// Runtime environment, decides whether debug hooks are exposed
    pub environment: Environment,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 10)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 60000)
    /// - `APP_ENV` - `development`, `dev` or `local` enable debug hooks (default: production)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            default_ttl_ms: env::var("CACHE_DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_MS),
            environment: Environment::detect(),
        }
    }

    /// Checks that the configuration can build a cache.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "CACHE_CAPACITY must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Default TTL as a `Duration`.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl_ms: DEFAULT_TTL_MS,
            environment: Environment::Production,
        }
    }
}
