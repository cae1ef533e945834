//! Result cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a cached lookup stays valid (default: 3 hours)
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Upper bound on stored entries before moka starts evicting
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_seconds() -> u64 {
    10800 // 3 hours
}

fn default_max_entries() -> u64 {
    10_000
}

impl CacheConfig {
    /// TTL as a `Duration`
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("cache ttl_seconds must be greater than 0".to_string());
        }
        if self.max_entries == 0 {
            return Err("cache max_entries must be greater than 0".to_string());
        }
        Ok(())
    }
}
