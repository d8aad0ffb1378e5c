//! Seasonal weather simulator
//!
//! Temperature follows a monthly baseline plus a diurnal cosine peaking at
//! 15:00, with a small uniform jitter. Rain is drawn from the month's
//! seasonal likelihood. Draws come from the caller's RNG so tests can seed
//! them.

use chrono::{DateTime, Datelike, Timelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::round_to;
use crate::constants::{DIURNAL_AMPLITUDE_C, TEMPERATURE_JITTER_C, TEMPERATURE_PEAK_HOUR};

/// Mean temperature in °C, January to December
const MONTHLY_BASELINE_C: [f64; 12] = [
    27.5, 28.5, 28.5, 28.0, 27.0, 25.5, 24.5, 24.5, 25.0, 26.0, 27.0, 27.5,
];

/// Probability of rain, January to December
const MONTHLY_RAIN_PROBABILITY: [f64; 12] = [
    0.05, 0.10, 0.20, 0.35, 0.55, 0.70, 0.40, 0.25, 0.40, 0.50, 0.25, 0.10,
];

const DRY_HUMIDITY_PCT: (f64, f64) = (65.0, 85.0);
const WET_HUMIDITY_PCT: (f64, f64) = (85.0, 98.0);
const WIND_SPEED_KMH: (f64, f64) = (5.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RainIntensity {
    None,
    Light,
    Moderate,
    Heavy,
}

impl RainIntensity {
    /// Classify a rainfall rate in mm/h
    pub fn from_mm_per_hour(mm: f64) -> Self {
        if mm.is_nan() || mm <= 0.0 {
            RainIntensity::None
        } else if mm < 2.5 {
            RainIntensity::Light
        } else if mm < 7.6 {
            RainIntensity::Moderate
        } else {
            RainIntensity::Heavy
        }
    }

    pub fn is_rain(&self) -> bool {
        !matches!(self, RainIntensity::None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kmh: f64,
    pub is_rainy: bool,
    pub rain_intensity: RainIntensity,
    pub condition_text: String,
}

/// Deterministic part of the temperature model
pub fn seasonal_temperature(month: u32, hour: u32) -> f64 {
    let baseline = MONTHLY_BASELINE_C[month_index(month)];
    let phase = 2.0 * PI * (hour as f64 - TEMPERATURE_PEAK_HOUR) / 24.0;
    baseline + DIURNAL_AMPLITUDE_C * phase.cos()
}

pub fn rain_probability(month: u32) -> f64 {
    MONTHLY_RAIN_PROBABILITY[month_index(month)]
}

fn month_index(month: u32) -> usize {
    (month.clamp(1, 12) - 1) as usize
}

/// Human readable condition
pub fn condition_text(intensity: RainIntensity, temperature_c: f64) -> String {
    let text = match intensity {
        RainIntensity::Heavy => "Heavy rain",
        RainIntensity::Moderate => "Moderate rain",
        RainIntensity::Light => "Light rain",
        RainIntensity::None if temperature_c >= 30.0 => "Hot and sunny",
        RainIntensity::None if temperature_c >= 26.0 => "Warm, partly cloudy",
        RainIntensity::None => "Mild, overcast",
    };
    text.to_string()
}

/// Simulate an observation for the given instant
pub fn simulate_weather<R: Rng>(at: DateTime<Utc>, rng: &mut R) -> WeatherReport {
    let month = at.month();

    let jitter = rng.gen_range(-TEMPERATURE_JITTER_C..=TEMPERATURE_JITTER_C);
    let temperature_c = round_to(seasonal_temperature(month, at.hour()) + jitter, 1);

    let rain_intensity = if rng.gen_bool(rain_probability(month)) {
        let roll: f64 = rng.gen();
        if roll < 0.6 {
            RainIntensity::Light
        } else if roll < 0.9 {
            RainIntensity::Moderate
        } else {
            RainIntensity::Heavy
        }
    } else {
        RainIntensity::None
    };
    let is_rainy = rain_intensity.is_rain();

    let (low, high) = if is_rainy {
        WET_HUMIDITY_PCT
    } else {
        DRY_HUMIDITY_PCT
    };
    let humidity_pct = round_to(rng.gen_range(low..=high), 1);
    let wind_speed_kmh = round_to(rng.gen_range(WIND_SPEED_KMH.0..=WIND_SPEED_KMH.1), 1);

    WeatherReport {
        temperature_c,
        humidity_pct,
        wind_speed_kmh,
        is_rainy,
        rain_intensity,
        condition_text: condition_text(rain_intensity, temperature_c),
    }
}
