//! Health tracker configuration.
//!
//! Defines the YAML format for the three-strikes health rule and the
//! recovery probe interval. Defaults are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FAILURE_THRESHOLD, DEFAULT_PROBE_INTERVAL_SECS};

fn default_failure_threshold() -> u32 {
    DEFAULT_FAILURE_THRESHOLD
}

fn default_probe_interval_seconds() -> u64 {
    DEFAULT_PROBE_INTERVAL_SECS
}

/// Health tracker configuration (YAML format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfigYaml {
    /// Number of consecutive failures that marks a service unhealthy
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Seconds between recovery probes of an unhealthy service (0 = never probe)
    #[serde(default = "default_probe_interval_seconds")]
    pub probe_interval_seconds: u64,
}

impl Default for HealthConfigYaml {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            probe_interval_seconds: default_probe_interval_seconds(),
        }
    }
}

impl HealthConfigYaml {
    /// Convert to HealthConfig from the health module
    pub fn to_health_config(&self) -> crate::health::HealthConfig {
        crate::health::HealthConfig {
            failure_threshold: self.failure_threshold,
            probe_interval: match self.probe_interval_seconds {
                0 => None,
                secs => Some(std::time::Duration::from_secs(secs)),
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.failure_threshold == 0 {
            return Err("health.failure_threshold must be at least 1".to_string());
        }
        Ok(())
    }
}
