//! Route resolution handler

use axum::{Json, extract::State};
use domain::{Coordinate, Fare, ResolvedRoute, TravelMode, format_distance, format_duration};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Route request body
///
/// Each endpoint is either free text or a `"lat,lon"` pair.
#[derive(Debug, Deserialize, Validate)]
pub struct RouteRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub departure: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub arrival: String,
}

/// GeoJSON `LineString`
#[derive(Debug, Clone, Serialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: Vec<Coordinate>,
}

/// Display figures for a route
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance: String,
    pub duration: String,
    pub driving_time: String,
    pub fare: Fare,
    pub fare_display: String,
}

impl RouteSummary {
    /// Summarize the selected route of a resolved trip
    #[must_use]
    pub fn of(route: &ResolvedRoute) -> Self {
        let fare = Fare::for_distance(route.result.distance_m());
        Self {
            distance: format_distance(route.result.distance_m()),
            duration: format_duration(route.result.duration_s()),
            driving_time: format_duration(route.result.display_driving_time_s()),
            fare,
            fare_display: fare.to_string(),
        }
    }
}

/// Route as returned to API clients
///
/// `drivingTime` is present exactly when the driving lookup succeeded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub mode: TravelMode,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driving_time: Option<f64>,
    pub geometry: LineString,
    pub departure: Coordinate,
    pub arrival: Coordinate,
    pub summary: RouteSummary,
}

impl From<&ResolvedRoute> for RouteResponse {
    fn from(route: &ResolvedRoute) -> Self {
        let result = &route.result;
        Self {
            mode: result.mode(),
            distance: result.distance_m(),
            duration: result.duration_s(),
            driving_time: result.driving_duration_s(),
            geometry: LineString {
                kind: "LineString",
                coordinates: result.geometry().to_vec(),
            },
            departure: route.departure,
            arrival: route.arrival,
            summary: RouteSummary::of(route),
        }
    }
}

/// Resolve a route between two endpoints
///
/// POST /v1/routes
#[instrument(skip(state, request))]
pub async fn resolve_route(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let route = state
        .route_service
        .resolve_route(&request.departure, &request.arrival)
        .await?;

    info!(
        mode = %route.result.mode(),
        distance_m = route.result.distance_m(),
        "Route resolved"
    );

    Ok(Json(RouteResponse::from(&route)))
}
