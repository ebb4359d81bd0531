//! Mwinda HTTP server
//!
//! Main entry point for the route and booking API.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{BookingService, DirectionsPort, GeocodingPort, HealthService, RouteService};
use infrastructure::{
    AppConfig, MapboxAdapter, SecurityValidator, SimulatedDispatchAdapter, SqliteBookingStore,
    SqliteDatabaseHealth, create_pool, init_tracing,
};
use presentation_http::{AppState, build_app, set_expose_internal_errors};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        let mut config = AppConfig::default();
        config.apply_token_fallback(std::env::var(infrastructure::config::MAPBOX_TOKEN_ENV).ok());
        config
    });

    init_tracing(config.server.log_format, infrastructure::DEFAULT_LOG_FILTER)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment(),
        "Mwinda starting"
    );

    let warnings = SecurityValidator::validate(&config);
    SecurityValidator::log_warnings(&warnings);
    if SecurityValidator::should_block_startup(&config, &warnings) {
        error!("Refusing to start with critical security warnings in production");
        anyhow::bail!("insecure configuration");
    }

    set_expose_internal_errors(!config.is_production());

    let mapbox = Arc::new(
        MapboxAdapter::new(&config.mapbox.to_mapbox_config())
            .context("failed to initialize the Mapbox client")?,
    );
    if !config.mapbox.has_access_token() {
        warn!("No Mapbox access token configured, route requests will fail");
    }

    let metro = config
        .mapbox
        .to_metro_area()
        .context("invalid metro area in mapbox configuration")?;
    let geocoding: Arc<dyn GeocodingPort> = mapbox.clone();
    let directions: Arc<dyn DirectionsPort> = mapbox;
    let route_service =
        Arc::new(RouteService::new(geocoding, directions).with_metro_area(metro));

    let pool = Arc::new(create_pool(&config.database).context("failed to open the database")?);
    info!(path = %config.database.path, "Database ready");

    let booking_service = BookingService::new(
        Arc::clone(&route_service),
        Arc::new(SqliteBookingStore::new(Arc::clone(&pool))),
        Arc::new(SimulatedDispatchAdapter::new(&config.dispatch)),
    );
    let health_service = HealthService::new(Arc::clone(&route_service))
        .with_database(Arc::new(SqliteDatabaseHealth::new(pool)));

    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let state = AppState {
        route_service,
        booking_service: Arc::new(booking_service),
        health_service: Arc::new(health_service),
        config: Arc::new(config),
    };
    let app = build_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }

    info!(?timeout, "Waiting for connections to close");
}
