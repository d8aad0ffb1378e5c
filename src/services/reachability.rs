//! OpenRouteService isochrones

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{require_api_key, require_endpoint, DataService};
use crate::config::ServiceConfig;
use crate::constants::SERVICE_REACHABILITY;
use crate::error::FetchError;
use crate::synth::{estimate_reachability, GeoPoint, Reachability};
use crate::upstream::{UpstreamRequest, UpstreamResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachabilityParams {
    pub center: GeoPoint,
    pub time_seconds: u64,
}

pub struct ReachabilityService {
    config: ServiceConfig,
}

impl ReachabilityService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

impl DataService for ReachabilityService {
    type Params = ReachabilityParams;
    type Output = Reachability;

    fn name(&self) -> &'static str {
        SERVICE_REACHABILITY
    }

    fn source_label(&self) -> &'static str {
        "OpenRouteService"
    }

    fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn build_request(&self, params: &ReachabilityParams) -> Result<UpstreamRequest, FetchError> {
        let endpoint = require_endpoint(&self.config)?;
        let api_key = require_api_key(&self.config)?;

        let body = json!({
            "locations": [params.center.to_lon_lat()],
            "range": [params.time_seconds],
        });

        Ok(UpstreamRequest::post(SERVICE_REACHABILITY, endpoint, body)
            .header("Authorization", api_key)
            .timeout(self.config.timeout))
    }

    fn parse_response(
        &self,
        params: &ReachabilityParams,
        response: &UpstreamResponse,
    ) -> Result<Reachability, FetchError> {
        let ring = response
            .body
            .pointer("/features/0/geometry/coordinates/0")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::InvalidResponse("isochrone has no polygon".to_string()))?;

        let polygon = ring
            .iter()
            .map(|position| match position.as_array().map(Vec::as_slice) {
                Some([lon, lat, ..]) => match (lon.as_f64(), lat.as_f64()) {
                    (Some(lon), Some(lat)) => Ok([lon, lat]),
                    _ => Err(FetchError::InvalidResponse(
                        "non-numeric isochrone position".to_string(),
                    )),
                },
                _ => Err(FetchError::InvalidResponse(
                    "malformed isochrone position".to_string(),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if polygon.len() < 4 {
            return Err(FetchError::InvalidResponse(format!(
                "isochrone ring has {} positions",
                polygon.len()
            )));
        }

        Ok(Reachability {
            polygon,
            center_point: params.center.to_lon_lat(),
            time_seconds: params.time_seconds,
        })
    }

    fn synthesize(&self, params: &ReachabilityParams) -> Reachability {
        estimate_reachability(params.center, params.time_seconds)
    }
}
