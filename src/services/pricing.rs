//! Uber price estimates

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{number_at, require_api_key, require_endpoint, str_at, DataService};
use crate::config::ServiceConfig;
use crate::constants::{FARE_CURRENCY, MILES_TO_KM, SERVICE_PRICING};
use crate::error::FetchError;
use crate::synth::{estimate_price, round_to, GeoPoint, PriceEstimate};
use crate::upstream::{UpstreamRequest, UpstreamResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceParams {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

pub struct PricingService {
    config: ServiceConfig,
}

impl PricingService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

impl DataService for PricingService {
    type Params = PriceParams;
    type Output = PriceEstimate;

    fn name(&self) -> &'static str {
        SERVICE_PRICING
    }

    fn source_label(&self) -> &'static str {
        "Uber"
    }

    fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn build_request(&self, params: &PriceParams) -> Result<UpstreamRequest, FetchError> {
        let endpoint = require_endpoint(&self.config)?;
        let api_key = require_api_key(&self.config)?;

        Ok(UpstreamRequest::get(SERVICE_PRICING, endpoint)
            .query("start_latitude", params.from.latitude)
            .query("start_longitude", params.from.longitude)
            .query("end_latitude", params.to.latitude)
            .query("end_longitude", params.to.longitude)
            .header("Authorization", format!("Token {}", api_key))
            .timeout(self.config.timeout))
    }

    fn parse_response(
        &self,
        _params: &PriceParams,
        response: &UpstreamResponse,
    ) -> Result<PriceEstimate, FetchError> {
        let body = &response.body;
        let low = number_at(body, "/prices/0/low_estimate")?;
        let high = number_at(body, "/prices/0/high_estimate")?;
        let duration_secs = number_at(body, "/prices/0/duration")?;
        let distance_miles = number_at(body, "/prices/0/distance")?;
        let surge_multiplier = number_at(body, "/prices/0/surge_multiplier").unwrap_or(1.0);
        let currency = str_at(body, "/prices/0/currency_code").unwrap_or(FARE_CURRENCY);

        Ok(PriceEstimate {
            fare_amount: round_to((low + high) / 2.0, 2),
            currency: currency.to_string(),
            eta_minutes: (duration_secs / 60.0).ceil().max(1.0) as u32,
            distance_km: round_to(distance_miles * MILES_TO_KM, 3),
            surge_multiplier,
        })
    }

    fn synthesize(&self, params: &PriceParams) -> PriceEstimate {
        estimate_price(params.from, params.to, Utc::now())
    }
}
