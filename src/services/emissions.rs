//! Carbon Interface vehicle estimates

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{number_at, require_api_key, require_endpoint, DataService};
use crate::config::ServiceConfig;
use crate::constants::SERVICE_EMISSIONS;
use crate::error::FetchError;
use crate::synth::{estimate_emissions, EmissionsEstimate};
use crate::upstream::{UpstreamRequest, UpstreamResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionsParams {
    pub distance_km: f64,
}

pub struct EmissionsService {
    config: ServiceConfig,
}

impl EmissionsService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

impl DataService for EmissionsService {
    type Params = EmissionsParams;
    type Output = EmissionsEstimate;

    fn name(&self) -> &'static str {
        SERVICE_EMISSIONS
    }

    fn source_label(&self) -> &'static str {
        "Carbon Interface"
    }

    fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn build_request(&self, params: &EmissionsParams) -> Result<UpstreamRequest, FetchError> {
        let endpoint = require_endpoint(&self.config)?;
        let api_key = require_api_key(&self.config)?;

        let mut body = json!({
            "type": "vehicle",
            "distance_unit": "km",
            "distance_value": params.distance_km,
        });
        if let Some(model) = self.config.option("vehicle_model_id") {
            body["vehicle_model_id"] = json!(model);
        }

        Ok(UpstreamRequest::post(SERVICE_EMISSIONS, endpoint, body)
            .header("Authorization", format!("Bearer {}", api_key))
            .timeout(self.config.timeout))
    }

    fn parse_response(
        &self,
        params: &EmissionsParams,
        response: &UpstreamResponse,
    ) -> Result<EmissionsEstimate, FetchError> {
        let carbon_kg = number_at(&response.body, "/data/attributes/carbon_kg")?;
        let carbon_metric_tons = number_at(&response.body, "/data/attributes/carbon_mt")
            .unwrap_or(carbon_kg / 1000.0);

        Ok(EmissionsEstimate {
            carbon_kg,
            carbon_metric_tons,
            distance_km: params.distance_km,
        })
    }

    fn synthesize(&self, params: &EmissionsParams) -> EmissionsEstimate {
        estimate_emissions(params.distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn service() -> EmissionsService {
        let mut config = ServiceConfig::new(SERVICE_EMISSIONS, Some("https://carbon.test/estimates"));
        config.api_key = Some("secret".to_string());
        EmissionsService::new(config)
    }

    #[test]
    fn test_build_request() {
        let request = service()
            .build_request(&EmissionsParams { distance_km: 15.5 })
            .unwrap();

        assert_eq!(request.url, "https://carbon.test/estimates");
        assert_eq!(request.header_value("Authorization"), Some("Bearer secret"));
        let body = request.body.unwrap();
        assert_eq!(body["type"], "vehicle");
        assert_eq!(body["distance_unit"], "km");
        assert_eq!(body["distance_value"], 15.5);
        assert!(body.get("vehicle_model_id").is_none());
    }

    #[test]
    fn test_vehicle_model_option() {
        let mut svc = service();
        svc.config.options = BTreeMap::from([("vehicle_model_id".to_string(), "abc-123".to_string())]);
        let request = svc.build_request(&EmissionsParams { distance_km: 1.0 }).unwrap();
        assert_eq!(request.body.unwrap()["vehicle_model_id"], "abc-123");
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let svc = EmissionsService::new(ServiceConfig::new(SERVICE_EMISSIONS, Some("https://carbon.test")));
        assert!(matches!(
            svc.build_request(&EmissionsParams { distance_km: 1.0 }),
            Err(FetchError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_parse_response() {
        let body = json!({
            "data": {
                "id": "e1",
                "type": "estimate",
                "attributes": { "distance_value": 15.5, "carbon_g": 3100, "carbon_kg": 3.1, "carbon_mt": 0.0031 }
            }
        });
        let params = EmissionsParams { distance_km: 15.5 };
        let estimate = service()
            .parse_response(&params, &UpstreamResponse::ok(body))
            .unwrap();
        assert_eq!(estimate.carbon_kg, 3.1);
        assert_eq!(estimate.carbon_metric_tons, 0.0031);
        assert_eq!(estimate.distance_km, 15.5);
    }

    #[test]
    fn test_malformed_body_is_invalid_response() {
        let params = EmissionsParams { distance_km: 1.0 };
        let err = service()
            .parse_response(&params, &UpstreamResponse::ok(json!({"errors": []})))
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }
}
