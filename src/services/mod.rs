//! Data service adapters
//!
//! One adapter per upstream domain. An adapter knows how to turn call
//! parameters into a live request, how to read the live answer, and how to
//! synthesize a local answer of the same shape. The gateway drives all five
//! through the same `DataService` seam.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;
use std::time::Duration;

use crate::config::{ServiceConfig, ServicesConfig};
use crate::constants::{
    SERVICE_EMISSIONS, SERVICE_HOLIDAYS, SERVICE_PRICING, SERVICE_REACHABILITY, SERVICE_WEATHER,
};
use crate::error::FetchError;
use crate::upstream::{UpstreamRequest, UpstreamResponse};

pub mod emissions;
pub mod holidays;
pub mod pricing;
pub mod reachability;
pub mod weather;

pub use emissions::{EmissionsParams, EmissionsService};
pub use holidays::{HolidayParams, HolidayService};
pub use pricing::{PriceParams, PricingService};
pub use reachability::{ReachabilityParams, ReachabilityService};
pub use weather::{WeatherParams, WeatherService};

/// One upstream data domain
pub trait DataService: Send + Sync {
    /// Call parameters; their canonical JSON form is the cache key
    type Params: Serialize + Debug + Send + Sync;
    /// Domain payload carried by the envelope
    type Output: Serialize + DeserializeOwned + Clone + Send + Sync;

    fn name(&self) -> &'static str;

    /// Source label of live envelopes
    fn source_label(&self) -> &'static str;

    fn config(&self) -> &ServiceConfig;

    fn build_request(&self, params: &Self::Params) -> Result<UpstreamRequest, FetchError>;

    fn parse_response(
        &self,
        params: &Self::Params,
        response: &UpstreamResponse,
    ) -> Result<Self::Output, FetchError>;

    /// Local approximation; never fails
    fn synthesize(&self, params: &Self::Params) -> Self::Output;

    fn live_ttl(&self) -> Duration {
        self.config().live_ttl
    }

    fn fallback_ttl(&self) -> Duration {
        self.config().fallback_ttl
    }

    fn timeout(&self) -> Duration {
        self.config().timeout
    }
}

/// The five adapters, built from configuration
pub struct Services {
    pub emissions: EmissionsService,
    pub reachability: ReachabilityService,
    pub holidays: HolidayService,
    pub weather: WeatherService,
    pub pricing: PricingService,
}

impl Services {
    pub fn from_config(config: &ServicesConfig) -> Self {
        Self {
            emissions: EmissionsService::new(config.resolve(SERVICE_EMISSIONS)),
            reachability: ReachabilityService::new(config.resolve(SERVICE_REACHABILITY)),
            holidays: HolidayService::new(config.resolve(SERVICE_HOLIDAYS)),
            weather: WeatherService::new(config.resolve(SERVICE_WEATHER)),
            pricing: PricingService::new(config.resolve(SERVICE_PRICING)),
        }
    }
}

// ============================================================================
// Shared helpers for adapters
// ============================================================================

pub(crate) fn require_endpoint(config: &ServiceConfig) -> Result<&str, FetchError> {
    config
        .endpoint
        .as_deref()
        .ok_or_else(|| FetchError::NotConfigured(format!("{} has no endpoint", config.name)))
}

pub(crate) fn require_api_key(config: &ServiceConfig) -> Result<&str, FetchError> {
    config
        .api_key
        .as_deref()
        .ok_or_else(|| FetchError::NotConfigured(format!("{} has no api_key", config.name)))
}

/// Number at a JSON pointer, or an `InvalidResponse` naming the pointer
pub(crate) fn number_at(body: &Value, pointer: &str) -> Result<f64, FetchError> {
    body.pointer(pointer)
        .and_then(Value::as_f64)
        .ok_or_else(|| FetchError::InvalidResponse(format!("missing number at {}", pointer)))
}

pub(crate) fn str_at<'a>(body: &'a Value, pointer: &str) -> Option<&'a str> {
    body.pointer(pointer).and_then(Value::as_str)
}
