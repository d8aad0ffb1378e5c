//! Cache configuration

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_CACHE_ENTRIES;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// When false every lookup misses and nothing is stored
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Upper bound on stored envelopes; least recently used entries go first
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_max_entries() -> u64 {
    DEFAULT_MAX_CACHE_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.max_entries == 0 {
            return Err("cache.max_entries must be positive when the cache is enabled".to_string());
        }
        Ok(())
    }
}
