// Fallback synthesizer unit tests

use chrono::{NaiveDate, TimeZone, Utc};
use kakehashi::synth::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_emissions_reference_value() {
    let estimate = estimate_emissions(15.5);
    assert_eq!(estimate.carbon_kg, 3.038);
    assert_eq!(estimate.carbon_metric_tons, 0.003038);
}

#[test]
fn test_isochrone_reference_shape() {
    let result = estimate_reachability(GeoPoint::new(5.6037, -0.1870), 1800);
    assert_eq!(result.polygon.len(), 7);
    assert_eq!(result.polygon.first(), result.polygon.last());

    let [cx, cy] = result.center_point;
    for [x, y] in &result.polygon {
        let radius = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
        assert!((radius - 0.0676).abs() < 1e-4);
    }
}

#[test]
fn test_haversine_tenth_degree_at_equator() {
    let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.1));
    let reference = 6371.0 * 0.1_f64.to_radians();
    assert!((d - reference).abs() < 1e-6);
}

#[test]
fn test_independence_day() {
    let status = holiday_status(NaiveDate::from_ymd_opt(2026, 3, 6).unwrap());
    assert!(status.is_holiday);
    assert_eq!(status.holiday_name.as_deref(), Some("Independence Day"));
}

#[test]
fn test_weather_is_reproducible_with_seed() {
    let at = Utc.with_ymd_and_hms(2026, 6, 1, 15, 0, 0).unwrap();
    let a = simulate_weather(at, &mut StdRng::seed_from_u64(99));
    let b = simulate_weather(at, &mut StdRng::seed_from_u64(99));
    assert_eq!(a, b);
    assert_eq!(a.is_rainy, a.rain_intensity != RainIntensity::None);
}

#[test]
fn test_price_fallback_is_surged_at_rush_hour() {
    let from = GeoPoint::new(5.6037, -0.1870);
    let to = GeoPoint::new(5.6037, -0.1420);
    let rush = estimate_price(from, to, Utc.with_ymd_and_hms(2026, 10, 19, 17, 15, 0).unwrap());
    let night = estimate_price(from, to, Utc.with_ymd_and_hms(2026, 10, 19, 23, 15, 0).unwrap());

    assert_eq!(rush.surge_multiplier, 1.5);
    assert_eq!(night.surge_multiplier, 1.0);
    assert!(rush.fare_amount > night.fare_amount);
    assert_eq!(rush.distance_km, night.distance_km);
}
