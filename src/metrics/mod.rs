// Gateway Prometheus metrics
//
// Provides metrics for the resilience layer:
// - Cache lookups per service (hit/miss)
// - Live call outcomes and latency per service
// - Fallbacks per service and reason
// - Current health flag per service

use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, Encoder,
    HistogramVec, IntCounterVec, IntGaugeVec, TextEncoder,
};
use std::sync::OnceLock;

/// Global metrics registry for the gateway
pub struct GatewayMetrics {
    /// Cache lookups by service and result (hit, miss)
    pub cache_lookups: IntCounterVec,

    /// Live calls by service and outcome (success, failure)
    pub live_calls: IntCounterVec,

    /// Fallback envelopes by service and reason (error, unhealthy, not_configured)
    pub fallbacks: IntCounterVec,

    /// Live call duration histogram (in seconds)
    pub live_call_duration: HistogramVec,

    /// 1 while the service is healthy, 0 otherwise
    pub service_healthy: IntGaugeVec,
}

/// Global singleton instance of metrics
static METRICS: OnceLock<GatewayMetrics> = OnceLock::new();

impl GatewayMetrics {
    /// Initialize and return the global metrics instance
    ///
    /// Subsequent calls return the same instance.
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| {
            let cache_lookups = register_int_counter_vec!(
                "kakehashi_cache_lookups_total",
                "Total number of cache lookups by service and result",
                &["service", "result"] // hit, miss
            )
            .expect("Failed to register cache_lookups_total metric");

            let live_calls = register_int_counter_vec!(
                "kakehashi_live_calls_total",
                "Total number of live upstream calls by service and outcome",
                &["service", "outcome"] // success, failure
            )
            .expect("Failed to register live_calls_total metric");

            let fallbacks = register_int_counter_vec!(
                "kakehashi_fallbacks_total",
                "Total number of synthesized fallback responses by service and reason",
                &["service", "reason"] // error, unhealthy, not_configured
            )
            .expect("Failed to register fallbacks_total metric");

            let live_call_duration = register_histogram_vec!(
                "kakehashi_live_call_duration_seconds",
                "Duration of live upstream calls in seconds",
                &["service"],
                vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0] // 10ms to 10s
            )
            .expect("Failed to register live_call_duration_seconds metric");

            let service_healthy = register_int_gauge_vec!(
                "kakehashi_service_healthy",
                "Whether the upstream service is currently considered healthy",
                &["service"]
            )
            .expect("Failed to register service_healthy metric");

            GatewayMetrics {
                cache_lookups,
                live_calls,
                fallbacks,
                live_call_duration,
                service_healthy,
            }
        })
    }

    pub fn record_cache_lookup(&self, service: &str, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        self.cache_lookups
            .with_label_values(&[service, result])
            .inc();
    }

    pub fn record_live_call(&self, service: &str, success: bool, duration_secs: f64) {
        let outcome = if success { "success" } else { "failure" };
        self.live_calls
            .with_label_values(&[service, outcome])
            .inc();
        self.live_call_duration
            .with_label_values(&[service])
            .observe(duration_secs);
    }

    pub fn record_fallback(&self, service: &str, reason: &str) {
        self.fallbacks.with_label_values(&[service, reason]).inc();
    }

    pub fn set_service_healthy(&self, service: &str, healthy: bool) {
        self.service_healthy
            .with_label_values(&[service])
            .set(i64::from(healthy));
    }
}

/// Render every registered metric in the Prometheus text format
pub fn export_text() -> Result<String, String> {
    // Make sure the gateway metrics exist even before the first call
    GatewayMetrics::global();

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| format!("Failed to encode metrics: {}", e))?;
    String::from_utf8(buffer).map_err(|e| format!("Metrics are not valid UTF-8: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_returns_same_instance() {
        let a = GatewayMetrics::global() as *const GatewayMetrics;
        let b = GatewayMetrics::global() as *const GatewayMetrics;
        assert_eq!(a, b);
    }

    #[test]
    fn test_counters_increment() {
        let metrics = GatewayMetrics::global();
        let before = metrics
            .fallbacks
            .with_label_values(&["metrics-test", "unhealthy"])
            .get();

        metrics.record_fallback("metrics-test", "unhealthy");

        let after = metrics
            .fallbacks
            .with_label_values(&["metrics-test", "unhealthy"])
            .get();
        assert_eq!(after, before + 1);
    }

    #[test]
    fn test_health_gauge() {
        let metrics = GatewayMetrics::global();
        metrics.set_service_healthy("metrics-gauge", false);
        assert_eq!(
            metrics
                .service_healthy
                .with_label_values(&["metrics-gauge"])
                .get(),
            0
        );
        metrics.set_service_healthy("metrics-gauge", true);
        assert_eq!(
            metrics
                .service_healthy
                .with_label_values(&["metrics-gauge"])
                .get(),
            1
        );
    }

    #[test]
    fn test_export_text_contains_gateway_metrics() {
        let metrics = GatewayMetrics::global();
        metrics.record_cache_lookup("metrics-export", true);
        metrics.record_live_call("metrics-export", true, 0.12);

        let text = export_text().unwrap();
        assert!(text.contains("kakehashi_cache_lookups_total"));
        assert!(text.contains("kakehashi_live_call_duration_seconds"));
    }
}
