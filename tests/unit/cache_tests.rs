// Cache store unit tests

use kakehashi::cache::{CacheConfig, CacheKey, MemoryCache, ResponseCache};
use serde_json::json;
use std::time::Duration;

#[test]
fn test_key_ignores_parameter_order() {
    let a = CacheKey::from_value("pricing", &json!({"from": {"latitude": 1.0, "longitude": 2.0}, "to": {"latitude": 3.0, "longitude": 4.0}}));
    let b = CacheKey::from_value("pricing", &json!({"to": {"longitude": 4.0, "latitude": 3.0}, "from": {"longitude": 2.0, "latitude": 1.0}}));
    assert_eq!(a, b);
}

#[test]
fn test_key_depends_on_domain_and_values() {
    let params = json!({"distance_km": 15.5});
    assert_ne!(
        CacheKey::from_value("emissions", &params),
        CacheKey::from_value("pricing", &params)
    );
    assert_ne!(
        CacheKey::from_value("emissions", &params),
        CacheKey::from_value("emissions", &json!({"distance_km": 15.6}))
    );
}

#[test]
fn test_key_display_is_prefixed_by_domain() {
    let key = CacheKey::from_value("weather", &json!({"location": [5.6, -0.18]}));
    assert!(key.to_string().starts_with("weather:"));
}

#[test]
fn test_lookup_within_ttl_returns_identical_payload() {
    tokio_test::block_on(async {
        let cache = MemoryCache::new(&CacheConfig::default());
        let key = CacheKey::from_value("holidays", &json!({"date": "2026-03-06"}));
        let payload = json!({"is_holiday": true, "holiday_name": "Independence Day"});

        cache.set(key.clone(), payload.clone(), Duration::from_secs(60)).await;

        let first = cache.get(&key).await.expect("entry should be present");
        let second = cache.get(&key).await.expect("entry should be present");
        assert_eq!(first.payload, payload);
        assert_eq!(
            serde_json::to_vec(&first.payload).unwrap(),
            serde_json::to_vec(&second.payload).unwrap()
        );
    });
}

#[tokio::test]
async fn test_never_returns_stale_entries() {
    let cache = MemoryCache::new(&CacheConfig::default());
    let key = CacheKey::from_value("weather", &json!({}));
    cache.set(key.clone(), json!({"temperature_c": 30.1}), Duration::from_millis(40)).await;

    tokio::time::sleep(Duration::from_millis(80)).await;

    assert!(cache.get(&key).await.is_none());
}

#[tokio::test]
async fn test_second_write_wins_and_restarts_clock() {
    let cache = MemoryCache::new(&CacheConfig::default());
    let key = CacheKey::from_value("pricing", &json!({"ride": 1}));

    cache.set(key.clone(), json!("old"), Duration::from_secs(60)).await;
    cache.set(key.clone(), json!("new"), Duration::from_secs(120)).await;

    let entry = cache.get(&key).await.expect("entry should be present");
    assert_eq!(entry.payload, json!("new"));
    assert_eq!(entry.ttl, Duration::from_secs(120));
    assert!(entry.remaining_ttl() > Duration::from_secs(60));
}
