//! Health dashboard types

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::constants::{DEGRADED_PERCENTAGE, HEALTHY_PERCENTAGE};
use crate::health::ServiceHealth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl OverallStatus {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= HEALTHY_PERCENTAGE {
            OverallStatus::Healthy
        } else if percentage >= DEGRADED_PERCENTAGE {
            OverallStatus::Degraded
        } else {
            OverallStatus::Unhealthy
        }
    }
}

/// Parameters of the representative fetches issued by the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardProbe {
    pub distance_km: f64,
    pub reachability_seconds: u64,
    /// Length of the east-bound ride priced from the configured location
    pub ride_km: f64,
}

impl Default for DashboardProbe {
    fn default() -> Self {
        Self {
            distance_km: 10.0,
            reachability_seconds: 900,
            ride_km: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    #[serde(flatten)]
    pub health: ServiceHealth,
    /// Whether the dashboard's own fetch for this service was live
    pub live_response: bool,
    pub source_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDashboard {
    pub overall_status: OverallStatus,
    pub health_percentage: f64,
    pub services: Vec<ServiceStatus>,
    pub cache: CacheStats,
    pub generated_at: DateTime<Utc>,
}

impl HealthDashboard {
    pub fn new(services: Vec<ServiceStatus>, cache: CacheStats) -> Self {
        let healthy = services.iter().filter(|s| s.health.is_healthy).count();
        let health_percentage = if services.is_empty() {
            0.0
        } else {
            (healthy as f64 / services.len() as f64 * 1000.0).round() / 10.0
        };

        Self {
            overall_status: OverallStatus::from_percentage(health_percentage),
            health_percentage,
            services,
            cache,
            generated_at: Utc::now(),
        }
    }

    pub fn healthy_count(&self) -> usize {
        self.services.iter().filter(|s| s.health.is_healthy).count()
    }
}
