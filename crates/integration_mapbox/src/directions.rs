//! Mapbox directions
//!
//! Calls `directions/v5/mapbox/{profile}/{lon},{lat};{lon},{lat}` with full
//! GeoJSON geometry and returns the first route.

use async_trait::async_trait;
use domain::{Coordinate, RoutePath, TravelMode};
use tracing::{debug, instrument, warn};

use crate::client::MapboxClient;
use crate::error::MapboxError;
use crate::models::RawDirectionsResponse;

/// Trait for directions clients
#[async_trait]
pub trait DirectionsClient: Send + Sync {
    /// Fetch the best route between two points for a travel mode
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<RoutePath, MapboxError>;
}

impl MapboxClient {
    /// Parse a directions response body into the first route
    fn parse_directions_response(body: &str, mode: TravelMode) -> Result<RoutePath, MapboxError> {
        let raw: RawDirectionsResponse =
            serde_json::from_str(body).map_err(|e| MapboxError::ParseError(e.to_string()))?;

        if raw.code != "Ok" {
            return Err(MapboxError::NoRoute {
                profile: mode.to_string(),
                reason: raw.message.unwrap_or(raw.code),
            });
        }

        let route = raw.routes.into_iter().next().ok_or_else(|| MapboxError::NoRoute {
            profile: mode.to_string(),
            reason: "response contained no routes".to_string(),
        })?;

        RoutePath::try_from(route)
    }
}

/// Format a waypoint pair the way the directions path expects
fn waypoints(from: Coordinate, to: Coordinate) -> String {
    format!(
        "{},{};{},{}",
        from.longitude(),
        from.latitude(),
        to.longitude(),
        to.latitude()
    )
}

#[async_trait]
impl DirectionsClient for MapboxClient {
    #[instrument(skip_all, fields(%mode, %from, %to))]
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<RoutePath, MapboxError> {
        let token = self.access_token()?;

        let coordinates = waypoints(from, to);
        let url = self.endpoint(&["directions", "v5", "mapbox", mode.as_str(), &coordinates])?;

        let params: [(&str, String); 3] = [
            ("geometries", "geojson".to_string()),
            ("overview", "full".to_string()),
            ("access_token", token.to_string()),
        ];

        let body = self.get(url, &params).await?;
        let route = Self::parse_directions_response(&body, mode).inspect_err(|e| {
            warn!(error = %e, "Directions returned no usable route");
        })?;

        debug!(
            distance_m = route.distance_m,
            duration_s = route.duration_s,
            points = route.geometry.len(),
            "Route found"
        );
        Ok(route)
    }
}
