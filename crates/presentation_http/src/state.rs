//! Application state shared across handlers

use std::sync::Arc;

use application::{BookingService, HealthService, RouteService};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Address resolution and dual-mode routing
    pub route_service: Arc<RouteService>,
    /// Booking lifecycle
    pub booking_service: Arc<BookingService>,
    /// Readiness probes
    pub health_service: Arc<HealthService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("route_service", &self.route_service)
            .field("environment", &self.config.environment())
            .finish_non_exhaustive()
    }
}
