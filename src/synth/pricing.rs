//! Ride price estimate
//!
//! `fare = max(base + km * per_km + minutes * per_minute, minimum) * surge`
//! where minutes come from the great-circle distance at a fixed urban speed.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::geo::{haversine_km, GeoPoint};
use super::round_to;
use crate::constants::{
    BASE_FARE, FARE_CURRENCY, MINIMUM_FARE, PEAK_SURGE_MULTIPLIER, PEAK_WINDOWS, PER_KM_RATE,
    PER_MINUTE_RATE, RIDE_SPEED_KMH,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub fare_amount: f64,
    pub currency: String,
    pub eta_minutes: u32,
    pub distance_km: f64,
    pub surge_multiplier: f64,
}

/// Surge factor for an hour of day (UTC)
pub fn surge_multiplier(hour: u32) -> f64 {
    if PEAK_WINDOWS
        .iter()
        .any(|(start, end)| (*start..*end).contains(&hour))
    {
        PEAK_SURGE_MULTIPLIER
    } else {
        1.0
    }
}

/// Travel time in whole minutes, never less than one
pub fn estimated_minutes(distance_km: f64) -> u32 {
    let minutes = (distance_km / RIDE_SPEED_KMH * 60.0).ceil();
    if minutes.is_finite() && minutes >= 1.0 {
        minutes as u32
    } else {
        1
    }
}

pub fn estimate_price(from: GeoPoint, to: GeoPoint, at: DateTime<Utc>) -> PriceEstimate {
    let distance_km = haversine_km(from, to);
    let eta_minutes = estimated_minutes(distance_km);
    let surge = surge_multiplier(at.hour());

    let fare = BASE_FARE + distance_km * PER_KM_RATE + eta_minutes as f64 * PER_MINUTE_RATE;
    let fare = fare.max(MINIMUM_FARE) * surge;

    PriceEstimate {
        fare_amount: round_to(fare, 2),
        currency: FARE_CURRENCY.to_string(),
        eta_minutes,
        distance_km: round_to(distance_km, 3),
        surge_multiplier: surge,
    }
}
