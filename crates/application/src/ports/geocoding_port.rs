//! Geocoding service port
//!
//! Turns free-text addresses into coordinates. Adapters in the
//! infrastructure layer implement this port on top of a vendor API.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A forward geocoding request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingRequest {
    /// Text sent to the geocoder, already biased toward the metro area
    pub query: String,
    /// ISO 3166 alpha-2 country filter
    pub country: String,
    /// Point results are biased toward
    pub proximity: Coordinate,
    /// Maximum number of matches
    pub limit: u8,
}

/// A geocoding match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    /// Display name
    pub name: String,
    /// Position of the match
    pub coordinate: Coordinate,
}

/// Port for geocoding
///
/// Implementations return matches best first. An empty list means the
/// address is unknown; failures of the call itself are reported as
/// `RouteError::GeocodingService`, a missing vendor credential as
/// `RouteError::MissingCredentials`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Search for places matching the request
    async fn geocode(
        &self,
        request: &GeocodingRequest,
    ) -> Result<Vec<GeocodedPlace>, ApplicationError>;

    /// Whether vendor credentials are configured
    fn has_credentials(&self) -> bool;
}
