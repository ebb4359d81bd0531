//! Directions service port
//!
//! Defines the interface for routing between two coordinates.

use async_trait::async_trait;
use domain::{Coordinate, RoutePath, TravelMode};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for routed directions
///
/// Implementations return the vendor's figures unchanged; plausibility
/// corrections belong to the route service. A failed call or an answer
/// without routes is reported as `RouteError::DirectionsService`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectionsPort: Send + Sync {
    /// Fetch the best route for a travel mode
    async fn fetch_route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<RoutePath, ApplicationError>;

    /// Whether vendor credentials are configured
    fn has_credentials(&self) -> bool;
}
