// Resilience orchestrator unit tests
//
// The gateway is driven through injected fetchers so that every property
// can be checked without network access.

use async_trait::async_trait;
use kakehashi::cache::{CacheConfig, MemoryCache};
use kakehashi::config::Config;
use kakehashi::constants::{SERVICE_EMISSIONS, SERVICE_PRICING, SERVICE_REACHABILITY};
use kakehashi::gateway::{OverallStatus, UNHEALTHY_REASON};
use kakehashi::upstream::{HttpFetcher, UpstreamRequest, UpstreamResponse};
use kakehashi::{FetchError, ServiceGateway};
use mockall::mock;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Fetcher {}

    #[async_trait]
    impl HttpFetcher for Fetcher {
        async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, FetchError>;
    }
}

/// Always fails and counts how often it was asked
#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl HttpFetcher for CountingFetcher {
    async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::Timeout {
            service: request.service,
            timeout_ms: 10,
        })
    }
}

fn keyed_config() -> Config {
    let mut config = Config::default();
    config.services.emissions.api_key = Some("carbon".to_string());
    config.services.reachability.api_key = Some("ors".to_string());
    config.services.weather.api_key = Some("owm".to_string());
    config.services.pricing.api_key = Some("uber".to_string());
    config
}

fn memory_cache() -> Arc<MemoryCache> {
    Arc::new(MemoryCache::new(&CacheConfig::default()))
}

#[tokio::test]
async fn test_skip_on_unhealthy_never_invokes_fetcher() {
    let counter = Arc::new(CountingFetcher::default());
    let gateway = ServiceGateway::with_parts(keyed_config(), memory_cache(), counter.clone());

    // Distinct parameters so every call misses the cache
    for seconds in [600, 900, 1200] {
        let envelope = gateway.fetch_reachability(5.6037, -0.1870, seconds).await;
        assert!(!envelope.is_live_data);
    }
    assert_eq!(counter.calls.load(Ordering::SeqCst), 3);
    assert!(!gateway.health().is_healthy(SERVICE_REACHABILITY));

    for seconds in [1500, 1800, 2100] {
        let envelope = gateway.fetch_reachability(5.6037, -0.1870, seconds).await;
        assert_eq!(envelope.fallback_reason.as_deref(), Some(UNHEALTHY_REASON));
        assert_eq!(envelope.data.polygon.len(), 7);
    }
    assert_eq!(counter.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_mocked_fetcher_is_not_called_when_unhealthy() {
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().times(0);

    let gateway = ServiceGateway::with_parts(keyed_config(), memory_cache(), Arc::new(fetcher));
    for _ in 0..3 {
        gateway
            .health()
            .record_failure(SERVICE_PRICING, "upstream returned HTTP 500");
    }

    let envelope = gateway
        .fetch_price_estimate(5.6037, -0.1870, 5.6500, -0.1500)
        .await;

    assert!(!envelope.is_live_data);
    assert_eq!(
        envelope.source_label,
        "local synthesis — service marked unhealthy"
    );
}

#[tokio::test]
async fn test_fallback_envelopes_are_always_labelled() {
    let gateway = ServiceGateway::with_parts(
        keyed_config(),
        memory_cache(),
        Arc::new(CountingFetcher::default()),
    );

    let emissions = gateway.fetch_emissions(15.5).await;
    let reachability = gateway.fetch_reachability(5.6037, -0.1870, 1800).await;
    let holidays = gateway.fetch_holiday_status().await;
    let weather = gateway.fetch_weather().await;
    let pricing = gateway.fetch_price_estimate(0.0, 0.0, 0.0, 0.1).await;

    let labels = [
        (emissions.is_live_data, emissions.source_label, emissions.fallback_reason),
        (reachability.is_live_data, reachability.source_label, reachability.fallback_reason),
        (holidays.is_live_data, holidays.source_label, holidays.fallback_reason),
        (weather.is_live_data, weather.source_label, weather.fallback_reason),
        (pricing.is_live_data, pricing.source_label, pricing.fallback_reason),
    ];
    for (is_live, label, reason) in labels {
        assert!(!is_live);
        assert!(label.starts_with("local synthesis — "));
        assert!(!reason.unwrap_or_default().is_empty());
    }

    assert_eq!(emissions.data.carbon_kg, 3.038);
    assert_eq!(emissions.data.carbon_metric_tons, 0.003038);
}

#[tokio::test]
async fn test_live_envelopes_are_marked_live() {
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().times(1).returning(|request| {
        assert_eq!(request.service, "weather");
        Ok(UpstreamResponse::ok(json!({
            "weather": [{ "main": "Clear", "description": "clear sky" }],
            "main": { "temp": 31.2, "humidity": 66 },
            "wind": { "speed": 3.0 }
        })))
    });

    let gateway = ServiceGateway::with_parts(keyed_config(), memory_cache(), Arc::new(fetcher));
    let envelope = gateway.fetch_weather().await;

    assert!(envelope.is_live_data);
    assert!(envelope.fallback_reason.is_none());
    assert_eq!(envelope.source_label, "OpenWeatherMap");
    assert_eq!(envelope.data.temperature_c, 31.2);
    assert_eq!(envelope.data.wind_speed_kmh, 10.8);
}

#[tokio::test]
async fn test_cached_envelope_is_byte_identical() {
    let counter = Arc::new(CountingFetcher::default());
    let gateway = ServiceGateway::with_parts(keyed_config(), memory_cache(), counter.clone());

    let first = gateway.fetch_weather().await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = gateway.fetch_weather().await;

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_expired_fallback_is_recomputed() {
    let mut config = keyed_config();
    config.services.emissions.fallback_ttl_seconds = Some(1);
    let counter = Arc::new(CountingFetcher::default());
    let gateway = ServiceGateway::with_parts(config, memory_cache(), counter.clone());

    let first = gateway.fetch_emissions(20.0).await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let second = gateway.fetch_emissions(20.0).await;

    assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
    assert!(second.timestamp > first.timestamp);
    assert_eq!(second.data, first.data);
}

#[tokio::test]
async fn test_concurrent_callers_all_get_envelopes() {
    let gateway = Arc::new(ServiceGateway::with_parts(
        keyed_config(),
        memory_cache(),
        Arc::new(CountingFetcher::default()),
    ));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let gateway = gateway.clone();
            tokio::spawn(async move { gateway.fetch_emissions(i as f64).await })
        })
        .collect();

    for handle in handles {
        let envelope = handle.await.expect("task panicked");
        assert!(!envelope.is_live_data);
    }
    assert!(!gateway.health().is_healthy(SERVICE_EMISSIONS));
}

#[tokio::test]
async fn test_dashboard_all_failing_is_unhealthy() {
    let mut config = keyed_config();
    config.cache.enabled = false;
    let gateway = ServiceGateway::with_parts(
        config,
        Arc::new(kakehashi::cache::NullCache),
        Arc::new(CountingFetcher::default()),
    );

    for _ in 0..3 {
        gateway.health_dashboard().await;
    }
    let dashboard = gateway.health_dashboard().await;

    assert_eq!(dashboard.health_percentage, 0.0);
    assert_eq!(dashboard.overall_status, OverallStatus::Unhealthy);
    assert!(dashboard.services.iter().all(|s| !s.live_response));

    let value = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(value["overall_status"], "unhealthy");
    assert_eq!(value["services"].as_array().unwrap().len(), 5);
}
