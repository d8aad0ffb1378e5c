//! Service Health Tracker
//!
//! Tracks the health of each upstream service independently and decides
//! whether the gateway may attempt a live call at all.
//!
//! State Machine (three-strikes rule):
//! - **Healthy**: live calls are attempted. Each failure increments
//!   `consecutive_failures`; reaching `failure_threshold` marks the service
//!   unhealthy.
//! - **Unhealthy**: live calls are skipped and served by fallback. Once
//!   `probe_interval` has elapsed a single caller is admitted as a recovery
//!   probe, which restarts the interval.
//!   - Any success → Healthy immediately, counter reset to 0
//!   - Failure → stays Unhealthy
//!
//! Records are created lazily on first reference; a never-seen service is
//! healthy.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::constants::{DEFAULT_FAILURE_THRESHOLD, DEFAULT_PROBE_INTERVAL_SECS};

/// Health tracker configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HealthConfig {
    /// Number of consecutive failures that marks a service unhealthy
    pub failure_threshold: u32,
    /// How long an unhealthy service is skipped before a recovery probe
    /// (None = never probe)
    pub probe_interval: Option<Duration>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            probe_interval: Some(Duration::from_secs(DEFAULT_PROBE_INTERVAL_SECS)),
        }
    }
}

/// Health record of one upstream service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub service: String,
    pub is_healthy: bool,
    pub consecutive_failures: u32,
    pub last_latency_ms: Option<f64>,
    pub last_error: Option<String>,
    pub last_checked_at: DateTime<Utc>,
    pub marked_unhealthy_at: Option<DateTime<Utc>>,
    pub total_successes: u64,
    pub total_failures: u64,
    /// Start of the current probe window while unhealthy
    #[serde(skip)]
    probe_window_start: Option<Instant>,
}

impl ServiceHealth {
    fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
            is_healthy: true,
            consecutive_failures: 0,
            last_latency_ms: None,
            last_error: None,
            last_checked_at: Utc::now(),
            marked_unhealthy_at: None,
            total_successes: 0,
            total_failures: 0,
            probe_window_start: None,
        }
    }
}

/// Admission decision for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Service is healthy: attempt the live call
    Live,
    /// Service is unhealthy but due for a recovery probe: attempt the live call
    Probe,
    /// Service is unhealthy: go straight to fallback
    Skip,
}

/// Per-service health tracker (process-local, shared by all callers)
#[derive(Debug, Default)]
pub struct HealthTracker {
    services: RwLock<HashMap<String, ServiceHealth>>,
    config: HealthConfig,
}

impl HealthTracker {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Record a successful live call
    ///
    /// Returns true if this success recovered an unhealthy service.
    pub fn record_success(&self, service: &str, latency_ms: f64) -> bool {
        let mut services = self.services.write();
        let record = services
            .entry(service.to_string())
            .or_insert_with(|| ServiceHealth::new(service));

        let recovered = !record.is_healthy;

        record.last_latency_ms = Some(latency_ms);
        record.last_error = None;
        record.consecutive_failures = 0;
        record.is_healthy = true;
        record.last_checked_at = Utc::now();
        record.marked_unhealthy_at = None;
        record.probe_window_start = None;
        record.total_successes += 1;

        if recovered {
            tracing::info!(service = service, latency_ms = latency_ms, "Service recovered");
        }
        recovered
    }

    /// Record a failed (or skipped) live call
    ///
    /// Returns true if this failure marked the service unhealthy.
    pub fn record_failure(&self, service: &str, error: &str) -> bool {
        let mut services = self.services.write();
        let record = services
            .entry(service.to_string())
            .or_insert_with(|| ServiceHealth::new(service));

        let was_healthy = record.is_healthy;

        record.consecutive_failures = record.consecutive_failures.saturating_add(1);
        record.is_healthy = record.consecutive_failures < self.config.failure_threshold;
        record.last_error = Some(error.to_string());
        record.last_checked_at = Utc::now();
        record.total_failures += 1;

        let marked = was_healthy && !record.is_healthy;
        if marked {
            record.marked_unhealthy_at = Some(record.last_checked_at);
            record.probe_window_start = Some(Instant::now());
            tracing::error!(
                service = service,
                consecutive_failures = record.consecutive_failures,
                error = error,
                "Service marked unhealthy after consecutive failures"
            );
        } else {
            tracing::debug!(
                service = service,
                consecutive_failures = record.consecutive_failures,
                threshold = self.config.failure_threshold,
                "Service failure recorded"
            );
        }
        marked
    }

    /// Whether a service is healthy (true for never-seen services)
    pub fn is_healthy(&self, service: &str) -> bool {
        self.services
            .read()
            .get(service)
            .map_or(true, |record| record.is_healthy)
    }

    /// Decide whether a live call may be attempted
    ///
    /// Granting a probe restarts the probe window, so concurrent callers
    /// do not all probe the same failing service.
    pub fn admit(&self, service: &str) -> Admission {
        if self.is_healthy(service) {
            return Admission::Live;
        }

        let Some(interval) = self.config.probe_interval else {
            return Admission::Skip;
        };

        let mut services = self.services.write();
        let Some(record) = services.get_mut(service) else {
            return Admission::Live;
        };
        if record.is_healthy {
            return Admission::Live;
        }

        let due = record
            .probe_window_start
            .map_or(true, |start| start.elapsed() >= interval);
        if due {
            record.probe_window_start = Some(Instant::now());
            tracing::info!(service = service, "Admitting recovery probe");
            Admission::Probe
        } else {
            Admission::Skip
        }
    }

    /// Get a copy of one service's record
    pub fn get(&self, service: &str) -> Option<ServiceHealth> {
        self.services.read().get(service).cloned()
    }

    /// Get the record of a service, or a fresh healthy record if never seen
    pub fn get_or_default(&self, service: &str) -> ServiceHealth {
        self.get(service)
            .unwrap_or_else(|| ServiceHealth::new(service))
    }

    /// All records, sorted by service name
    pub fn snapshot(&self) -> Vec<ServiceHealth> {
        let mut records: Vec<ServiceHealth> = self.services.read().values().cloned().collect();
        records.sort_by(|a, b| a.service.cmp(&b.service));
        records
    }

    /// Forget all health state (every service becomes healthy)
    pub fn reset(&self) {
        self.services.write().clear();
    }
}
