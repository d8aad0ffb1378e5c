//! Resilience Orchestrator
//!
//! Every `fetch_*` operation follows the same linear flow:
//!
//! 1. A valid cache entry short-circuits everything, even for an unhealthy
//!    service.
//! 2. An unhealthy service is not called (unless it is due for a recovery
//!    probe).
//! 3. One live attempt under the service timeout. Success is cached with
//!    the live TTL.
//! 4. Any failure or skip produces a synthesized envelope, cached with the
//!    shorter fallback TTL.
//!
//! There is no retry loop: a single failure falls back immediately.
//! Callers only ever see envelopes.

pub mod dashboard;

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Instant;

use crate::cache::{build_cache, CacheKey, CacheStats, ResponseCache};
use crate::config::Config;
use crate::constants::{
    ALL_SERVICES, KM_PER_DEGREE, SERVICE_EMISSIONS, SERVICE_HOLIDAYS, SERVICE_PRICING,
    SERVICE_REACHABILITY, SERVICE_WEATHER,
};
use crate::envelope::Envelope;
use crate::error::{FetchError, GatewayError};
use crate::health::{Admission, HealthConfig, HealthTracker, ServiceHealth};
use crate::metrics::GatewayMetrics;
use crate::services::{
    DataService, EmissionsParams, HolidayParams, PriceParams, ReachabilityParams, Services,
    WeatherParams,
};
use crate::synth::{
    EmissionsEstimate, GeoPoint, HolidayStatus, PriceEstimate, Reachability, WeatherReport,
};
use crate::upstream::{HttpFetcher, ReqwestFetcher};

pub use dashboard::{DashboardProbe, HealthDashboard, OverallStatus, ServiceStatus};

/// Fallback reason used when the live call is skipped
pub const UNHEALTHY_REASON: &str = "service marked unhealthy";

/// Resilient entry point for the five data domains
///
/// Every `fetch_*` call returns an envelope: a cache hit, a live response, or
/// a local synthesis when the live call fails or is skipped. Once a service
/// is marked unhealthy, live calls are skipped except for one recovery probe
/// per `health.probe_interval_seconds`. Setting that interval to `0` turns
/// probing off, so an unhealthy service is never called again until
/// `reset_health`.
pub struct ServiceGateway {
    config: Config,
    services: Services,
    cache: Arc<dyn ResponseCache>,
    fetcher: Arc<dyn HttpFetcher>,
    health: HealthTracker,
    metrics: &'static GatewayMetrics,
}

impl ServiceGateway {
    /// Build a gateway with the reqwest fetcher and the configured cache
    pub fn new(config: Config) -> Result<Self, GatewayError> {
        config.validate().map_err(GatewayError::Config)?;
        let fetcher = ReqwestFetcher::new()?;
        let cache = build_cache(&config.cache);
        Ok(Self::with_parts(config, cache, Arc::new(fetcher)))
    }

    /// Build a gateway around an injected cache and fetcher
    pub fn with_parts(
        config: Config,
        cache: Arc<dyn ResponseCache>,
        fetcher: Arc<dyn HttpFetcher>,
    ) -> Self {
        let services = Services::from_config(&config.services);
        let health = HealthTracker::new(config.health.to_health_config());

        Self {
            config,
            services,
            cache,
            fetcher,
            health,
            metrics: GatewayMetrics::global(),
        }
    }

    /// Replace the health tracker (and its state) with a new configuration
    pub fn with_health_config(mut self, health: HealthConfig) -> Self {
        self.health = HealthTracker::new(health);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn health(&self) -> &HealthTracker {
        &self.health
    }

    fn home(&self) -> GeoPoint {
        GeoPoint::new(self.config.location.latitude, self.config.location.longitude)
    }

    // ========================================================================
    // Domain operations
    // ========================================================================

    pub async fn fetch_emissions(&self, distance_km: f64) -> Envelope<EmissionsEstimate> {
        self.fetch_through(&self.services.emissions, EmissionsParams { distance_km })
            .await
    }

    pub async fn fetch_reachability(
        &self,
        latitude: f64,
        longitude: f64,
        time_seconds: u64,
    ) -> Envelope<Reachability> {
        let params = ReachabilityParams {
            center: GeoPoint::new(latitude, longitude),
            time_seconds,
        };
        self.fetch_through(&self.services.reachability, params)
            .await
    }

    /// Holiday status of today (UTC) in the configured country
    pub async fn fetch_holiday_status(&self) -> Envelope<HolidayStatus> {
        self.fetch_holiday_status_on(Utc::now().date_naive()).await
    }

    pub async fn fetch_holiday_status_on(&self, date: NaiveDate) -> Envelope<HolidayStatus> {
        let params = HolidayParams {
            country_code: self.config.location.country_code.clone(),
            date,
        };
        self.fetch_through(&self.services.holidays, params).await
    }

    /// Current weather at the configured location
    pub async fn fetch_weather(&self) -> Envelope<WeatherReport> {
        let params = WeatherParams {
            location: self.home(),
        };
        self.fetch_through(&self.services.weather, params).await
    }

    pub async fn fetch_price_estimate(
        &self,
        start_latitude: f64,
        start_longitude: f64,
        end_latitude: f64,
        end_longitude: f64,
    ) -> Envelope<PriceEstimate> {
        let params = PriceParams {
            from: GeoPoint::new(start_latitude, start_longitude),
            to: GeoPoint::new(end_latitude, end_longitude),
        };
        self.fetch_through(&self.services.pricing, params).await
    }

    // ========================================================================
    // Dashboard and administration
    // ========================================================================

    pub async fn health_dashboard(&self) -> HealthDashboard {
        self.health_dashboard_with(&DashboardProbe::default()).await
    }

    /// Run the five fetches concurrently and summarize service health
    pub async fn health_dashboard_with(&self, probe: &DashboardProbe) -> HealthDashboard {
        let home = self.home();
        let ride_degrees = probe.ride_km / (KM_PER_DEGREE * home.latitude.to_radians().cos().max(0.01));
        let destination = GeoPoint::new(home.latitude, home.longitude + ride_degrees);

        let (emissions, reachability, holidays, weather, pricing) = tokio::join!(
            self.fetch_emissions(probe.distance_km),
            self.fetch_reachability(home.latitude, home.longitude, probe.reachability_seconds),
            self.fetch_holiday_status(),
            self.fetch_weather(),
            self.fetch_price_estimate(
                home.latitude,
                home.longitude,
                destination.latitude,
                destination.longitude
            ),
        );

        let probes = [
            (SERVICE_EMISSIONS, emissions.is_live_data, emissions.source_label),
            (SERVICE_REACHABILITY, reachability.is_live_data, reachability.source_label),
            (SERVICE_HOLIDAYS, holidays.is_live_data, holidays.source_label),
            (SERVICE_WEATHER, weather.is_live_data, weather.source_label),
            (SERVICE_PRICING, pricing.is_live_data, pricing.source_label),
        ];

        let services = probes
            .into_iter()
            .map(|(name, live_response, source_label)| ServiceStatus {
                health: self.health.get_or_default(name),
                live_response,
                source_label,
            })
            .collect();

        let dashboard = HealthDashboard::new(services, self.cache.stats().await);
        tracing::info!(
            overall_status = ?dashboard.overall_status,
            health_percentage = dashboard.health_percentage,
            "Health dashboard generated"
        );
        dashboard
    }

    pub fn service_health(&self, service: &str) -> ServiceHealth {
        self.health.get_or_default(service)
    }

    /// Forget all health state; every service is tried live again
    pub fn reset_health(&self) {
        self.health.reset();
        for name in ALL_SERVICES {
            self.metrics.set_service_healthy(name, true);
        }
        tracing::info!("Service health reset");
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        tracing::info!("Response cache cleared");
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    // ========================================================================
    // Dispatch policy
    // ========================================================================

    async fn fetch_through<S: DataService>(
        &self,
        service: &S,
        params: S::Params,
    ) -> Envelope<S::Output> {
        let name = service.name();
        let key = CacheKey::derive(name, &params);

        if let Some(entry) = self.cache.get(&key).await {
            match serde_json::from_value::<Envelope<S::Output>>(entry.payload) {
                Ok(envelope) => {
                    tracing::debug!(service = name, cache_key = %key, "Cache hit");
                    self.metrics.record_cache_lookup(name, true);
                    return envelope;
                }
                Err(e) => {
                    tracing::warn!(
                        service = name,
                        cache_key = %key,
                        error = %e,
                        "Discarding cached payload that no longer deserializes"
                    );
                }
            }
        }
        tracing::debug!(service = name, cache_key = %key, "Cache miss");
        self.metrics.record_cache_lookup(name, false);

        let (envelope, ttl) = match self.health.admit(name) {
            Admission::Skip => {
                tracing::debug!(service = name, "Service unhealthy, skipping live call");
                self.record_failure(name, UNHEALTHY_REASON);
                self.metrics.record_fallback(name, "unhealthy");
                let data = service.synthesize(&params);
                (Envelope::fallback(data, UNHEALTHY_REASON), service.fallback_ttl())
            }
            Admission::Live | Admission::Probe => match self.call_live(service, &params).await {
                Ok(data) => (
                    Envelope::live(data, service.source_label()),
                    service.live_ttl(),
                ),
                Err(err) => {
                    self.metrics.record_fallback(name, err.metric_reason());
                    let data = service.synthesize(&params);
                    (Envelope::fallback(data, err.to_string()), service.fallback_ttl())
                }
            },
        };

        match serde_json::to_value(&envelope) {
            Ok(payload) => self.cache.set(key, payload, ttl).await,
            Err(e) => {
                tracing::warn!(service = name, error = %e, "Envelope not cacheable");
            }
        }

        envelope
    }

    /// One live attempt; records the outcome in the health tracker
    async fn call_live<S: DataService>(
        &self,
        service: &S,
        params: &S::Params,
    ) -> Result<S::Output, FetchError> {
        let name = service.name();

        let request = match service.build_request(params) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(service = name, error = %err, "Live call not attempted");
                self.record_failure(name, &err.to_string());
                return Err(err);
            }
        };

        let timeout = service.timeout();
        let started = Instant::now();
        let result = match tokio::time::timeout(timeout, self.fetcher.fetch(request)).await {
            Ok(Ok(response)) => service.parse_response(params, &response),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(FetchError::Timeout {
                service: name.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        };
        let elapsed = started.elapsed();
        let latency_ms = elapsed.as_secs_f64() * 1000.0;

        match &result {
            Ok(_) => {
                tracing::debug!(service = name, latency_ms = latency_ms, "Live call succeeded");
                self.metrics
                    .record_live_call(name, true, elapsed.as_secs_f64());
                self.health.record_success(name, latency_ms);
                self.metrics.set_service_healthy(name, true);
            }
            Err(err) => {
                tracing::warn!(
                    service = name,
                    latency_ms = latency_ms,
                    error = %err,
                    "Live call failed, falling back to local synthesis"
                );
                self.metrics
                    .record_live_call(name, false, elapsed.as_secs_f64());
                self.record_failure(name, &err.to_string());
            }
        }

        result
    }

    fn record_failure(&self, service: &str, error: &str) {
        self.health.record_failure(service, error);
        self.metrics
            .set_service_healthy(service, self.health.is_healthy(service));
    }
}
