//! Mwinda CLI
//!
//! Command-line interface for administration and route checks.

#![allow(clippy::print_stdout)]

use std::{fmt::Write as _, path::PathBuf, sync::Arc};

use anyhow::Context;
use application::{DirectionsPort, GeocodingPort, RouteService};
use clap::{Parser, Subcommand};
use domain::{Fare, ResolvedRoute, format_distance, format_duration};
use infrastructure::{AppConfig, ApiKeyHasher, LogFormat, MapboxAdapter, init_tracing};

/// Mwinda CLI
#[derive(Parser)]
#[command(name = "mwinda-cli")]
#[command(author, version, about = "Mwinda ride-booking CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash an API key using Argon2 for secure storage in configuration
    ///
    /// Example: mwinda-cli hash-api-key mw-my-secret-key
    HashApiKey {
        /// The plaintext API key to hash
        api_key: String,

        /// Verify the hash against the key after hashing
        #[arg(long)]
        verify: bool,
    },

    /// Resolve a route against Mapbox and print its summary
    ///
    /// Each endpoint is an address or a "lat,lon" pair.
    /// Example: mwinda-cli route "Gombe" "-4.3560,15.3460"
    Route {
        /// Departure
        #[arg(allow_hyphen_values = true)]
        from: String,

        /// Arrival
        #[arg(allow_hyphen_values = true)]
        to: String,

        /// Configuration file (default: ./config.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full route as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check server readiness (used by container healthchecks)
    Health {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Join a base URL and a path without doubling the slash
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Human-readable route summary
fn render_route(route: &ResolvedRoute) -> String {
    let result = &route.result;
    let mut out = String::new();
    let _ = writeln!(out, "Departure:    {}", route.departure.to_lat_lon_string());
    let _ = writeln!(out, "Arrival:      {}", route.arrival.to_lat_lon_string());
    let _ = writeln!(out, "Mode:         {}", result.mode());
    let _ = writeln!(out, "Distance:     {}", format_distance(result.distance_m()));
    let _ = writeln!(out, "Duration:     {}", format_duration(result.duration_s()));
    let _ = writeln!(
        out,
        "Driving time: {}",
        format_duration(result.display_driving_time_s())
    );
    if let Some(walking) = result.walking_duration_s() {
        let _ = writeln!(out, "Walking time: {}", format_duration(walking));
    }
    let _ = write!(out, "Fare:         {}", Fare::for_distance(result.distance_m()));
    out
}

async fn resolve_route(from: &str, to: &str, config: Option<PathBuf>) -> anyhow::Result<ResolvedRoute> {
    let config = AppConfig::load_from(config.as_deref()).context("failed to load configuration")?;

    let mapbox = Arc::new(
        MapboxAdapter::new(&config.mapbox.to_mapbox_config())
            .context("failed to initialize the Mapbox client")?,
    );
    let metro = config
        .mapbox
        .to_metro_area()
        .context("invalid metro area in mapbox configuration")?;
    let geocoding: Arc<dyn GeocodingPort> = mapbox.clone();
    let directions: Arc<dyn DirectionsPort> = mapbox;
    let service = RouteService::new(geocoding, directions).with_metro_area(metro);

    Ok(service.resolve_route(from, to).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(LogFormat::Text, log_filter_from_verbosity(cli.verbose))?;

    match cli.command {
        Commands::HashApiKey { api_key, verify } => {
            let hasher = ApiKeyHasher::new();
            let hash = hasher.hash(&api_key).context("failed to hash API key")?;

            println!("API key hash (Argon2id):");
            println!();
            println!("{hash}");
            println!();
            println!("Add to config.toml:");
            println!("   [[security.api_keys]]");
            println!("   hash = \"{hash}\"");
            println!("   user_id = \"YOUR-USER-UUID\"");

            if verify {
                println!();
                if hasher.verify(&api_key, &hash)? {
                    println!("Verification: hash matches");
                } else {
                    anyhow::bail!("hash does not match the key");
                }
            }
        },

        Commands::Route {
            from,
            to,
            config,
            json,
        } => {
            let route = resolve_route(&from, &to, config).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                println!("{}", render_route(&route));
            }
        },

        Commands::Health { url } => {
            let client = reqwest::Client::new();
            match client.get(endpoint_url(&url, "/ready")).send().await {
                Ok(resp) if resp.status().is_success() => {
                    println!("Healthy");
                },
                Ok(resp) => {
                    println!("Unhealthy: HTTP {}", resp.status());
                    std::process::exit(1);
                },
                Err(e) => {
                    println!("Unhealthy: {e}");
                    std::process::exit(1);
                },
            }
        },
    }

    Ok(())
}
