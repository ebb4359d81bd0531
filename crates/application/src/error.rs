//! Application-level errors

use domain::{DomainError, TravelMode};
use thiserror::Error;

/// Failures of the route-resolution workflow
///
/// Every variant ends the current attempt; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Geocoding returned zero matches
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// The geocoding call itself failed
    #[error("Geocoding service error: {0}")]
    GeocodingService(String),

    /// The directions call failed or returned no route
    #[error("Directions service error ({mode}): {message}")]
    DirectionsService {
        /// Mode that was requested
        mode: TravelMode,
        /// What went wrong
        message: String,
    },

    /// Neither driving nor walking produced a route
    #[error("No route available between departure and arrival")]
    NoRouteAvailable,

    /// The mapping vendor credentials are not configured
    #[error("Mapping service credentials are not configured")]
    MissingCredentials,
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Route resolution error
    #[error(transparent)]
    Route(#[from] RouteError),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Requested entity does not exist (or is not visible to the caller)
    #[error("Not found: {0}")]
    NotFound(String),

    /// User not authorized
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// The route error, if this is one
    pub const fn as_route_error(&self) -> Option<&RouteError> {
        match self {
            Self::Route(e) => Some(e),
            _ => None,
        }
    }
}
