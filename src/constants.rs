// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase,
// including the fixed model parameters of the fallback synthesizers.

// =============================================================================
// Service names
// =============================================================================

/// Emissions estimation service
pub const SERVICE_EMISSIONS: &str = "emissions";

/// Reachability / isochrone service
pub const SERVICE_REACHABILITY: &str = "reachability";

/// Public holiday lookup service
pub const SERVICE_HOLIDAYS: &str = "holidays";

/// Weather observation service
pub const SERVICE_WEATHER: &str = "weather";

/// Ride price estimation service
pub const SERVICE_PRICING: &str = "pricing";

/// All services, in dashboard order
pub const ALL_SERVICES: [&str; 5] = [
    SERVICE_EMISSIONS,
    SERVICE_REACHABILITY,
    SERVICE_HOLIDAYS,
    SERVICE_WEATHER,
    SERVICE_PRICING,
];

// =============================================================================
// Live call defaults
// =============================================================================

/// Default live call timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Live call timeout for the latency-sensitive lookups (holidays, weather, pricing)
pub const DEFAULT_SHORT_TIMEOUT_MS: u64 = 5_000;

/// Live call timeout for isochrone computation
pub const DEFAULT_REACHABILITY_TIMEOUT_MS: u64 = 8_000;

// =============================================================================
// Cache defaults
// =============================================================================

/// Default maximum number of cached envelopes
pub const DEFAULT_MAX_CACHE_ENTRIES: u64 = 10_000;

/// Emissions live / fallback TTL in seconds
pub const EMISSIONS_LIVE_TTL_SECS: u64 = 3600;
pub const EMISSIONS_FALLBACK_TTL_SECS: u64 = 600;

/// Reachability live / fallback TTL in seconds
pub const REACHABILITY_LIVE_TTL_SECS: u64 = 1800;
pub const REACHABILITY_FALLBACK_TTL_SECS: u64 = 300;

/// Holiday status live / fallback TTL in seconds (a full day when live)
pub const HOLIDAYS_LIVE_TTL_SECS: u64 = 86_400;
pub const HOLIDAYS_FALLBACK_TTL_SECS: u64 = 3600;

/// Weather live / fallback TTL in seconds
pub const WEATHER_LIVE_TTL_SECS: u64 = 900;
pub const WEATHER_FALLBACK_TTL_SECS: u64 = 300;

/// Price estimate live / fallback TTL in seconds
pub const PRICING_LIVE_TTL_SECS: u64 = 600;
pub const PRICING_FALLBACK_TTL_SECS: u64 = 120;

// =============================================================================
// Health tracker defaults
// =============================================================================

/// Consecutive failures before a service is marked unhealthy
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Seconds an unhealthy service is skipped before a single recovery probe
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 60;

/// Dashboard bucket: at or above this percentage the system is healthy
pub const HEALTHY_PERCENTAGE: f64 = 80.0;

/// Dashboard bucket: at or above this percentage the system is degraded
pub const DEGRADED_PERCENTAGE: f64 = 50.0;

// =============================================================================
// Default location (Accra, Ghana)
// =============================================================================

pub const DEFAULT_LATITUDE: f64 = 5.6037;
pub const DEFAULT_LONGITUDE: f64 = -0.1870;
pub const DEFAULT_COUNTRY_CODE: &str = "GH";

// =============================================================================
// Default live endpoints
// =============================================================================

pub const DEFAULT_EMISSIONS_ENDPOINT: &str = "https://www.carboninterface.com/api/v1/estimates";
pub const DEFAULT_REACHABILITY_ENDPOINT: &str =
    "https://api.openrouteservice.org/v2/isochrones/driving-car";
pub const DEFAULT_HOLIDAYS_ENDPOINT: &str = "https://date.nager.at/api/v3/PublicHolidays";
pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_PRICING_ENDPOINT: &str = "https://api.uber.com/v1.2/estimates/price";

// =============================================================================
// Synthesis model parameters
// =============================================================================

/// Regional vehicle emission factor (kg CO2 per km)
pub const EMISSION_FACTOR_KG_PER_KM: f64 = 0.196;

/// Average speed used for the isochrone fallback (dense urban traffic)
pub const ISOCHRONE_SPEED_KMH: f64 = 15.0;

/// Approximate kilometres per degree of latitude
pub const KM_PER_DEGREE: f64 = 111.0;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average urban speed used to estimate ride duration
pub const RIDE_SPEED_KMH: f64 = 20.0;

/// Fare model (GHS)
pub const BASE_FARE: f64 = 5.00;
pub const PER_KM_RATE: f64 = 2.50;
pub const PER_MINUTE_RATE: f64 = 0.35;
pub const MINIMUM_FARE: f64 = 8.00;
pub const FARE_CURRENCY: &str = "GHS";

/// Surge multiplier applied inside the daily peak windows
pub const PEAK_SURGE_MULTIPLIER: f64 = 1.5;

/// Morning and evening peak windows as [start_hour, end_hour) pairs
pub const PEAK_WINDOWS: [(u32, u32); 2] = [(7, 10), (16, 20)];

/// Hour of day at which the synthetic temperature curve peaks
pub const TEMPERATURE_PEAK_HOUR: f64 = 15.0;

/// Half the day-night temperature swing in °C
pub const DIURNAL_AMPLITUDE_C: f64 = 3.5;

/// Uniform jitter applied to the synthetic temperature in °C
pub const TEMPERATURE_JITTER_C: f64 = 1.0;

/// Live weather conversion: metres per second to kilometres per hour
pub const MS_TO_KMH: f64 = 3.6;

/// Live ride distance conversion: miles to kilometres
pub const MILES_TO_KM: f64 = 1.609_344;
