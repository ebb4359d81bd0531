//! Health check handlers

use application::ServiceHealth;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Whether a Mapbox access token is configured
    pub mapbox_configured: bool,
    pub mapbox: ServiceHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<ServiceHealth>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Readiness check - can the server resolve routes and store bookings?
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let mut report = state.health_service.check_all().await;

    let mapbox = report
        .services
        .remove("mapbox")
        .unwrap_or_else(|| ServiceHealth::unhealthy("not checked"));
    let database = report.services.remove("database");

    let status_code = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready: report.healthy,
            mapbox_configured: mapbox.healthy,
            mapbox,
            database,
            checked_at: report.checked_at,
        }),
    )
}
