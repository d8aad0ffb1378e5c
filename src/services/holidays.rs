//! Nager.Date public holidays

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{require_endpoint, str_at, DataService};
use crate::config::ServiceConfig;
use crate::constants::SERVICE_HOLIDAYS;
use crate::error::FetchError;
use crate::synth::{holiday_status, HolidayStatus};
use crate::upstream::{UpstreamRequest, UpstreamResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayParams {
    pub country_code: String,
    pub date: NaiveDate,
}

pub struct HolidayService {
    config: ServiceConfig,
}

impl HolidayService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

impl DataService for HolidayService {
    type Params = HolidayParams;
    type Output = HolidayStatus;

    fn name(&self) -> &'static str {
        SERVICE_HOLIDAYS
    }

    fn source_label(&self) -> &'static str {
        "Nager.Date"
    }

    fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // No credentials needed
    fn build_request(&self, params: &HolidayParams) -> Result<UpstreamRequest, FetchError> {
        let endpoint = require_endpoint(&self.config)?;
        let url = format!(
            "{}/{}/{}",
            endpoint,
            params.date.year(),
            params.country_code.to_uppercase()
        );
        Ok(UpstreamRequest::get(SERVICE_HOLIDAYS, url).timeout(self.config.timeout))
    }

    fn parse_response(
        &self,
        params: &HolidayParams,
        response: &UpstreamResponse,
    ) -> Result<HolidayStatus, FetchError> {
        let holidays = response.body.as_array().ok_or_else(|| {
            FetchError::InvalidResponse("expected an array of holidays".to_string())
        })?;

        let today = params.date.format("%Y-%m-%d").to_string();
        let name = holidays
            .iter()
            .find(|holiday| holiday.get("date").and_then(Value::as_str) == Some(today.as_str()))
            .map(|holiday| {
                str_at(holiday, "/name")
                    .or_else(|| str_at(holiday, "/localName"))
                    .unwrap_or("Public holiday")
                    .to_string()
            });

        Ok(HolidayStatus::new(params.date, name))
    }

    fn synthesize(&self, params: &HolidayParams) -> HolidayStatus {
        holiday_status(params.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> HolidayService {
        HolidayService::new(ServiceConfig::new(SERVICE_HOLIDAYS, Some("https://nager.test/api/v3/PublicHolidays")))
    }

    fn params(month: u32, day: u32) -> HolidayParams {
        HolidayParams {
            country_code: "gh".to_string(),
            date: NaiveDate::from_ymd_opt(2026, month, day).unwrap(),
        }
    }

    fn calendar() -> Value {
        json!([
            { "date": "2026-03-06", "localName": "Independence Day", "name": "Independence Day", "countryCode": "GH" },
            { "date": "2026-04-03", "localName": "Good Friday", "name": "Good Friday", "countryCode": "GH" }
        ])
    }

    #[test]
    fn test_url_contains_year_and_country() {
        let request = service().build_request(&params(3, 6)).unwrap();
        assert_eq!(request.url, "https://nager.test/api/v3/PublicHolidays/2026/GH");
        assert!(request.header_value("Authorization").is_none());
    }

    #[test]
    fn test_matching_day_is_holiday() {
        let status = service()
            .parse_response(&params(4, 3), &UpstreamResponse::ok(calendar()))
            .unwrap();
        assert!(status.is_holiday);
        assert_eq!(status.holiday_name.as_deref(), Some("Good Friday"));
    }

    #[test]
    fn test_other_day_is_not_holiday() {
        let status = service()
            .parse_response(&params(10, 19), &UpstreamResponse::ok(calendar()))
            .unwrap();
        assert!(!status.is_holiday);
    }

    #[test]
    fn test_object_body_is_invalid() {
        let err = service()
            .parse_response(&params(1, 1), &UpstreamResponse::ok(json!({"status": 404})))
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }
}
