// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cache::CacheConfig;
use crate::constants::{DEFAULT_COUNTRY_CODE, DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
use crate::logging::LoggingConfig;

pub mod health;
pub mod service;

pub use health::HealthConfigYaml;
pub use service::{ServiceConfig, ServiceConfigYaml, ServicesConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub health: HealthConfigYaml,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub services: ServicesConfig,
}

/// Location used by the parameterless lookups (weather, holidays)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// ISO 3166-1 alpha-2 country code for the holiday calendar
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            country_code: default_country_code(),
        }
    }
}

fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}

fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        // An empty document means "all defaults"
        if substituted.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.health.validate()?;
        self.cache.validate()?;
        self.logging.validate()?;

        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(format!(
                "location.latitude {} is outside [-90, 90]",
                self.location.latitude
            ));
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(format!(
                "location.longitude {} is outside [-180, 180]",
                self.location.longitude
            ));
        }
        if self.location.country_code.trim().is_empty() {
            return Err("location.country_code cannot be empty".to_string());
        }

        for service in self.services.resolve_all() {
            service.validate()?;
        }

        Ok(())
    }
}
