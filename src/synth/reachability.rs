//! Isochrone approximation
//!
//! A live isochrone follows the road network. The fallback assumes a flat
//! average urban speed and returns a hexagon around the center, closed by
//! repeating its first vertex.

use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;
use crate::constants::{ISOCHRONE_SPEED_KMH, KM_PER_DEGREE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reachability {
    /// Closed ring of `[lon, lat]` positions
    pub polygon: Vec<[f64; 2]>,
    /// `[lon, lat]`
    pub center_point: [f64; 2],
    pub time_seconds: u64,
}

/// Area reachable from `center` within `time_seconds`
pub fn estimate_reachability(center: GeoPoint, time_seconds: u64) -> Reachability {
    let radius_km = (time_seconds as f64 / 3600.0) * ISOCHRONE_SPEED_KMH;
    let radius_degrees = radius_km / KM_PER_DEGREE;

    Reachability {
        polygon: hexagon(center, radius_degrees),
        center_point: center.to_lon_lat(),
        time_seconds,
    }
}

/// Six vertices at 60° bearings (0° = north) plus the closing vertex.
/// Vertices that would leave the coordinate range are clamped onto it.
pub fn hexagon(center: GeoPoint, radius_degrees: f64) -> Vec<[f64; 2]> {
    let mut ring: Vec<[f64; 2]> = (0..6)
        .map(|i| {
            let bearing = (60.0 * i as f64).to_radians();
            GeoPoint::new(
                center.latitude + radius_degrees * bearing.cos(),
                center.longitude + radius_degrees * bearing.sin(),
            )
            .to_lon_lat()
        })
        .collect();
    ring.push(ring[0]);
    ring
}
