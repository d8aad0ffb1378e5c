// Service health tracker unit tests

use kakehashi::health::{Admission, HealthConfig, HealthTracker};

#[test]
fn test_exactly_three_failures_mark_unhealthy() {
    let tracker = HealthTracker::new(HealthConfig::default());

    tracker.record_failure("reachability", "timeout");
    tracker.record_failure("reachability", "timeout");
    assert!(tracker.is_healthy("reachability"));

    tracker.record_failure("reachability", "timeout");
    assert!(!tracker.is_healthy("reachability"));
    assert_eq!(tracker.admit("reachability"), Admission::Skip);
}

#[test]
fn test_one_success_recovers() {
    let tracker = HealthTracker::new(HealthConfig::default());
    for _ in 0..3 {
        tracker.record_failure("reachability", "HTTP 502");
    }

    tracker.record_success("reachability", 250.0);

    let record = tracker.get("reachability").expect("record should exist");
    assert!(record.is_healthy);
    assert_eq!(record.consecutive_failures, 0);
    assert!(record.last_error.is_none());
    assert_eq!(tracker.admit("reachability"), Admission::Live);
}

#[test]
fn test_record_serializes_for_dashboard() {
    let tracker = HealthTracker::new(HealthConfig::default());
    tracker.record_failure("weather", "connection refused");

    let value = serde_json::to_value(tracker.get("weather").unwrap()).unwrap();
    assert_eq!(value["service"], "weather");
    assert_eq!(value["consecutive_failures"], 1);
    assert_eq!(value["last_error"], "connection refused");
    assert!(value.get("probe_window_start").is_none());
}
