//! OpenWeatherMap current conditions

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{number_at, require_api_key, require_endpoint, str_at, DataService};
use crate::config::ServiceConfig;
use crate::constants::{MS_TO_KMH, SERVICE_WEATHER};
use crate::error::FetchError;
use crate::synth::{round_to, simulate_weather, GeoPoint, RainIntensity, WeatherReport};
use crate::upstream::{UpstreamRequest, UpstreamResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherParams {
    pub location: GeoPoint,
}

pub struct WeatherService {
    config: ServiceConfig,
}

impl WeatherService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

impl DataService for WeatherService {
    type Params = WeatherParams;
    type Output = WeatherReport;

    fn name(&self) -> &'static str {
        SERVICE_WEATHER
    }

    fn source_label(&self) -> &'static str {
        "OpenWeatherMap"
    }

    fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn build_request(&self, params: &WeatherParams) -> Result<UpstreamRequest, FetchError> {
        let endpoint = require_endpoint(&self.config)?;
        let api_key = require_api_key(&self.config)?;

        Ok(UpstreamRequest::get(SERVICE_WEATHER, endpoint)
            .query("lat", params.location.latitude)
            .query("lon", params.location.longitude)
            .query("units", "metric")
            .query("appid", api_key)
            .timeout(self.config.timeout))
    }

    fn parse_response(
        &self,
        _params: &WeatherParams,
        response: &UpstreamResponse,
    ) -> Result<WeatherReport, FetchError> {
        let body = &response.body;
        let temperature_c = number_at(body, "/main/temp")?;
        let humidity_pct = number_at(body, "/main/humidity")?;
        let wind_speed_kmh = number_at(body, "/wind/speed").unwrap_or(0.0) * MS_TO_KMH;

        let main = str_at(body, "/weather/0/main").unwrap_or_default();
        let mut rain_intensity =
            RainIntensity::from_mm_per_hour(number_at(body, "/rain/1h").unwrap_or(0.0));
        // Rain reported without a volume
        if !rain_intensity.is_rain() && matches!(main, "Rain" | "Drizzle" | "Thunderstorm") {
            rain_intensity = RainIntensity::Light;
        }

        let condition_text = match str_at(body, "/weather/0/description") {
            Some(description) if !description.is_empty() => capitalize(description),
            _ if !main.is_empty() => main.to_string(),
            _ => "Unknown".to_string(),
        };

        Ok(WeatherReport {
            temperature_c: round_to(temperature_c, 1),
            humidity_pct: round_to(humidity_pct, 1),
            wind_speed_kmh: round_to(wind_speed_kmh, 1),
            is_rainy: rain_intensity.is_rain(),
            rain_intensity,
            condition_text,
        })
    }

    fn synthesize(&self, _params: &WeatherParams) -> WeatherReport {
        simulate_weather(Utc::now(), &mut rand::thread_rng())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
