use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use kakehashi::config::Config;
use kakehashi::synth::GeoPoint;
use kakehashi::ServiceGateway;

/// Kakehashi - resilient gateway to third-party data services
#[derive(Parser, Debug)]
#[command(name = "kakehashi")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate vehicle emissions for a distance
    Emissions {
        #[arg(long)]
        distance_km: f64,
    },
    /// Area reachable from a point within a time budget
    Reachability {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, default_value_t = 1800)]
        seconds: u64,
    },
    /// Whether today is a public holiday
    Holiday,
    /// Current weather at the configured location
    Weather,
    /// Ride price estimate between two LAT,LON points
    Price {
        #[arg(long, allow_hyphen_values = true)]
        from: GeoPoint,
        #[arg(long, allow_hyphen_values = true)]
        to: GeoPoint,
    },
    /// Probe every service and print the health summary
    Dashboard,
    /// Print Prometheus metrics after probing every service
    Metrics,
    /// Validate configuration and exit
    CheckConfig,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    kakehashi::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow!(e))
        .context("Failed to initialize logging subsystem")?;

    if let Command::CheckConfig = args.command {
        config.validate().map_err(|e| anyhow!(e))?;
        let services: Vec<_> = config
            .services
            .resolve_all()
            .into_iter()
            .map(|s| {
                serde_json::json!({
                    "service": s.name,
                    "endpoint": s.endpoint,
                    "has_api_key": s.api_key.is_some(),
                    "timeout_ms": s.timeout.as_millis() as u64,
                    "live_ttl_seconds": s.live_ttl.as_secs(),
                    "fallback_ttl_seconds": s.fallback_ttl.as_secs(),
                })
            })
            .collect();
        return print_json(&serde_json::json!({ "valid": true, "services": services }));
    }

    let gateway = ServiceGateway::new(config)?;

    tracing::info!(
        config_file = ?args.config,
        command = ?args.command,
        "Gateway initialized"
    );

    match args.command {
        Command::Emissions { distance_km } => print_json(&gateway.fetch_emissions(distance_km).await),
        Command::Reachability { lat, lon, seconds } => {
            print_json(&gateway.fetch_reachability(lat, lon, seconds).await)
        }
        Command::Holiday => print_json(&gateway.fetch_holiday_status().await),
        Command::Weather => print_json(&gateway.fetch_weather().await),
        Command::Price { from, to } => print_json(
            &gateway
                .fetch_price_estimate(from.latitude, from.longitude, to.latitude, to.longitude)
                .await,
        ),
        Command::Dashboard => print_json(&gateway.health_dashboard().await),
        Command::Metrics => {
            gateway.health_dashboard().await;
            let text = kakehashi::metrics::export_text().map_err(|e| anyhow!(e))?;
            print!("{}", text);
            Ok(())
        }
        Command::CheckConfig => Ok(()),
    }
}
