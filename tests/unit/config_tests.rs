// Configuration loading unit tests

use kakehashi::config::Config;
use kakehashi::constants::{SERVICE_EMISSIONS, SERVICE_HOLIDAYS, SERVICE_WEATHER};
use kakehashi::logging::LogFormat;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(yaml.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[test]
fn test_can_load_full_config_from_file() {
    std::env::set_var("KAKEHASHI_IT_CARBON_KEY", "carbon-from-env");
    let file = write_config(
        r#"
logging:
  level: debug
  format: pretty
cache:
  max_entries: 500
health:
  failure_threshold: 5
  probe_interval_seconds: 30
location:
  latitude: 6.6885
  longitude: -1.6244
  country_code: GH
services:
  emissions:
    api_key: ${KAKEHASHI_IT_CARBON_KEY}
    options:
      vehicle_model_id: 7268a9b7-17e8-4c8d-acca-57059252afe9
  weather:
    enabled: false
"#,
    );

    let config = Config::from_file(file.path()).expect("Failed to load config");
    assert!(config.validate().is_ok());

    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(config.cache.max_entries, 500);
    assert_eq!(config.health.failure_threshold, 5);
    assert_eq!(
        config.health.to_health_config().probe_interval,
        Some(Duration::from_secs(30))
    );

    let emissions = config.services.resolve(SERVICE_EMISSIONS);
    assert_eq!(emissions.api_key.as_deref(), Some("carbon-from-env"));
    assert_eq!(
        emissions.option("vehicle_model_id"),
        Some("7268a9b7-17e8-4c8d-acca-57059252afe9")
    );

    let weather = config.services.resolve(SERVICE_WEATHER);
    assert!(weather.endpoint.is_none());
}

#[test]
fn test_missing_env_var_is_an_error() {
    let file = write_config(
        r#"
services:
  pricing:
    api_key: ${KAKEHASHI_IT_DEFINITELY_UNSET}
"#,
    );
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(err.contains("KAKEHASHI_IT_DEFINITELY_UNSET"));
}

#[test]
fn test_missing_file_is_an_error() {
    let result = Config::from_file("/nonexistent/kakehashi.yaml");
    assert!(result.is_err());
}

#[test]
fn test_unset_sections_keep_service_defaults() {
    let config = Config::from_yaml_with_env("services:\n  holidays:\n    timeout_ms: 1500\n")
        .expect("Failed to parse config");
    let holidays = config.services.resolve(SERVICE_HOLIDAYS);
    assert_eq!(holidays.timeout, Duration::from_millis(1500));
    assert_eq!(holidays.live_ttl, Duration::from_secs(86_400));
    assert_eq!(holidays.fallback_ttl, Duration::from_secs(3600));
}

#[test]
fn test_rejects_fallback_ttl_longer_than_live_ttl() {
    let config = Config::from_yaml_with_env(
        "services:\n  weather:\n    live_ttl_seconds: 60\n    fallback_ttl_seconds: 120\n",
    )
    .expect("Failed to parse config");
    assert!(config.validate().is_err());
}

#[test]
fn test_rejects_fallback_ttl_equal_to_live_ttl() {
    let config = Config::from_yaml_with_env(
        "services:\n  holidays:\n    live_ttl_seconds: 3600\n    fallback_ttl_seconds: 3600\n",
    )
    .expect("Failed to parse config");
    assert!(config.validate().is_err());
}

#[test]
fn test_rejects_latitude_out_of_range() {
    let config = Config::from_yaml_with_env("location:\n  latitude: 95.0\n")
        .expect("Failed to parse config");
    assert!(config.validate().is_err());
}
