//! Fallback synthesizers
//!
//! Local approximations of each upstream service. They are pure functions of
//! their inputs (plus the clock and an RNG for weather), never fail, and
//! clamp invalid input instead of rejecting it.

pub mod emissions;
pub mod geo;
pub mod holidays;
pub mod pricing;
pub mod reachability;
pub mod weather;

pub use emissions::{estimate_emissions, EmissionsEstimate};
pub use geo::{haversine_km, GeoPoint};
pub use holidays::{fixed_holiday, holiday_status, HolidayStatus, NATIONAL_HOLIDAYS};
pub use pricing::{estimate_price, surge_multiplier, PriceEstimate};
pub use reachability::{estimate_reachability, hexagon, Reachability};
pub use weather::{simulate_weather, RainIntensity, WeatherReport};

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// NaN, infinite and negative values become 0
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
