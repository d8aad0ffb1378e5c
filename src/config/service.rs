//! Per-service upstream configuration.
//!
//! Every field is optional in YAML. Missing values are resolved against the
//! defaults of the service they belong to, so `weather: { api_key: x }` keeps
//! the weather endpoint, timeout and TTLs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::constants::*;

/// One upstream service as written in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfigYaml {
    /// Disabled services are always served by fallback synthesis
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_ttl_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_ttl_seconds: Option<u64>,
    /// Service-specific extras (e.g. `vehicle_model_id` for emissions)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for ServiceConfigYaml {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            api_key: None,
            timeout_ms: None,
            live_ttl_seconds: None,
            fallback_ttl_seconds: None,
            options: BTreeMap::new(),
        }
    }
}

/// All upstream services
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub emissions: ServiceConfigYaml,
    #[serde(default)]
    pub reachability: ServiceConfigYaml,
    #[serde(default)]
    pub holidays: ServiceConfigYaml,
    #[serde(default)]
    pub weather: ServiceConfigYaml,
    #[serde(default)]
    pub pricing: ServiceConfigYaml,
}

/// Built-in defaults for one service
struct ServiceDefaults {
    endpoint: &'static str,
    timeout_ms: u64,
    live_ttl_secs: u64,
    fallback_ttl_secs: u64,
}

fn defaults_for(name: &str) -> ServiceDefaults {
    match name {
        SERVICE_EMISSIONS => ServiceDefaults {
            endpoint: DEFAULT_EMISSIONS_ENDPOINT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            live_ttl_secs: EMISSIONS_LIVE_TTL_SECS,
            fallback_ttl_secs: EMISSIONS_FALLBACK_TTL_SECS,
        },
        SERVICE_REACHABILITY => ServiceDefaults {
            endpoint: DEFAULT_REACHABILITY_ENDPOINT,
            timeout_ms: DEFAULT_REACHABILITY_TIMEOUT_MS,
            live_ttl_secs: REACHABILITY_LIVE_TTL_SECS,
            fallback_ttl_secs: REACHABILITY_FALLBACK_TTL_SECS,
        },
        SERVICE_HOLIDAYS => ServiceDefaults {
            endpoint: DEFAULT_HOLIDAYS_ENDPOINT,
            timeout_ms: DEFAULT_SHORT_TIMEOUT_MS,
            live_ttl_secs: HOLIDAYS_LIVE_TTL_SECS,
            fallback_ttl_secs: HOLIDAYS_FALLBACK_TTL_SECS,
        },
        SERVICE_WEATHER => ServiceDefaults {
            endpoint: DEFAULT_WEATHER_ENDPOINT,
            timeout_ms: DEFAULT_SHORT_TIMEOUT_MS,
            live_ttl_secs: WEATHER_LIVE_TTL_SECS,
            fallback_ttl_secs: WEATHER_FALLBACK_TTL_SECS,
        },
        SERVICE_PRICING => ServiceDefaults {
            endpoint: DEFAULT_PRICING_ENDPOINT,
            timeout_ms: DEFAULT_SHORT_TIMEOUT_MS,
            live_ttl_secs: PRICING_LIVE_TTL_SECS,
            fallback_ttl_secs: PRICING_FALLBACK_TTL_SECS,
        },
        // Unknown services get the generic timeout and the shortest TTLs
        _ => ServiceDefaults {
            endpoint: "",
            timeout_ms: DEFAULT_TIMEOUT_MS,
            live_ttl_secs: PRICING_LIVE_TTL_SECS,
            fallback_ttl_secs: PRICING_FALLBACK_TTL_SECS,
        },
    }
}

impl ServicesConfig {
    fn yaml_for(&self, name: &str) -> Option<&ServiceConfigYaml> {
        match name {
            SERVICE_EMISSIONS => Some(&self.emissions),
            SERVICE_REACHABILITY => Some(&self.reachability),
            SERVICE_HOLIDAYS => Some(&self.holidays),
            SERVICE_WEATHER => Some(&self.weather),
            SERVICE_PRICING => Some(&self.pricing),
            _ => None,
        }
    }

    /// Resolve one service's runtime configuration
    pub fn resolve(&self, name: &str) -> ServiceConfig {
        let defaults = defaults_for(name);
        let fallback_yaml = ServiceConfigYaml::default();
        let yaml = self.yaml_for(name).unwrap_or(&fallback_yaml);

        let endpoint = if !yaml.enabled {
            None
        } else {
            match &yaml.endpoint {
                Some(url) => Some(url.trim_end_matches('/').to_string()),
                None if defaults.endpoint.is_empty() => None,
                None => Some(defaults.endpoint.to_string()),
            }
        };

        ServiceConfig {
            name: name.to_string(),
            endpoint,
            api_key: yaml.api_key.clone().filter(|k| !k.is_empty()),
            timeout: Duration::from_millis(yaml.timeout_ms.unwrap_or(defaults.timeout_ms)),
            live_ttl: Duration::from_secs(yaml.live_ttl_seconds.unwrap_or(defaults.live_ttl_secs)),
            fallback_ttl: Duration::from_secs(
                yaml.fallback_ttl_seconds
                    .unwrap_or(defaults.fallback_ttl_secs),
            ),
            options: yaml.options.clone(),
        }
    }

    /// Resolve every known service, in dashboard order
    pub fn resolve_all(&self) -> Vec<ServiceConfig> {
        ALL_SERVICES.iter().map(|name| self.resolve(name)).collect()
    }
}

/// Runtime configuration of one upstream service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub name: String,
    /// None when the service is disabled
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub live_ttl: Duration,
    pub fallback_ttl: Duration,
    pub options: BTreeMap<String, String>,
}

impl ServiceConfig {
    /// Build a configuration directly (tests and embedding callers)
    pub fn new(name: &str, endpoint: Option<&str>) -> Self {
        let mut config = ServicesConfig::default().resolve(name);
        config.endpoint = endpoint.map(|e| e.trim_end_matches('/').to_string());
        config
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeout.is_zero() {
            return Err(format!("services.{}.timeout_ms must be positive", self.name));
        }
        if self.live_ttl.is_zero() {
            return Err(format!(
                "services.{}.live_ttl_seconds must be positive",
                self.name
            ));
        }
        if self.fallback_ttl >= self.live_ttl {
            return Err(format!(
                "services.{}: fallback_ttl_seconds ({}) must be shorter than live_ttl_seconds ({})",
                self.name,
                self.fallback_ttl.as_secs(),
                self.live_ttl.as_secs()
            ));
        }
        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(format!(
                    "services.{}.endpoint '{}' must be an http(s) URL",
                    self.name, endpoint
                ));
            }
        }
        Ok(())
    }
}
