//! Vehicle emissions estimate

use serde::{Deserialize, Serialize};

use super::{non_negative, round_to};
use crate::constants::EMISSION_FACTOR_KG_PER_KM;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsEstimate {
    pub carbon_kg: f64,
    pub carbon_metric_tons: f64,
    pub distance_km: f64,
}

/// Linear estimate from the regional emission factor
pub fn estimate_emissions(distance_km: f64) -> EmissionsEstimate {
    let distance_km = non_negative(distance_km);
    let carbon_kg = round_to(distance_km * EMISSION_FACTOR_KG_PER_KM, 3);

    EmissionsEstimate {
        carbon_kg,
        carbon_metric_tons: round_to(carbon_kg / 1000.0, 6),
        distance_km,
    }
}
