//! API error handling
//!
//! Provides sanitized error responses that don't leak implementation details.
//! In production mode, internal errors return generic messages without details.

use application::{ApplicationError, RouteError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

const GENERIC_MESSAGE: &str = "An error occurred processing your request";

/// Configure whether internal error details should be exposed in responses.
///
/// Set to `false` in production.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

fn sanitize_error_message(msg: &str) -> String {
    sanitize_with(msg, should_expose_details())
}

/// Replace messages that look like they carry paths, URLs or connection
/// details with a generic one
fn sanitize_with(msg: &str, expose: bool) -> String {
    if expose {
        return msg.to_string();
    }

    let sensitive_patterns = [
        "/home/",
        "/Users/",
        "/var/",
        "/etc/",
        "C:\\",
        "sqlite://",
        "access_token",
        "panicked at",
        ".rs:",
        "connection refused",
        "timeout",
    ];

    let msg_lower = msg.to_lowercase();
    if sensitive_patterns
        .iter()
        .any(|pattern| msg_lower.contains(&pattern.to_lowercase()))
        || msg.contains("://")
    {
        return GENERIC_MESSAGE.to_string();
    }

    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request was understood but no route could be produced for it
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// An upstream mapping service failed
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                sanitize_error_message(msg),
                None,
            ),
            Self::Unauthorized(msg) => {
                let sanitized = if should_expose_details() {
                    msg.clone()
                } else {
                    "Authentication required".to_string()
                };
                (StatusCode::UNAUTHORIZED, "unauthorized", sanitized, None)
            },
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not_found",
                sanitize_error_message(msg),
                None,
            ),
            Self::Conflict(msg) => (
                StatusCode::CONFLICT,
                "conflict",
                sanitize_error_message(msg),
                None,
            ),
            Self::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "route_unavailable",
                sanitize_error_message(msg),
                None,
            ),
            Self::BadGateway(msg) => {
                let sanitized = if should_expose_details() {
                    msg.clone()
                } else {
                    "Mapping service unavailable".to_string()
                };
                (StatusCode::BAD_GATEWAY, "upstream_error", sanitized, None)
            },
            Self::Internal(msg) => {
                let details = should_expose_details().then(|| msg.clone());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    details,
                )
            },
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => e.into(),
            ApplicationError::Route(e) => e.into(),
            ApplicationError::ExternalService(msg) => Self::BadGateway(msg),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::NotAuthorized(msg) => Self::Unauthorized(msg),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::AddressNotFound(_) | RouteError::NoRouteAvailable => {
                Self::Unprocessable(err.to_string())
            },
            RouteError::GeocodingService(_) | RouteError::DirectionsService { .. } => {
                Self::BadGateway(err.to_string())
            },
            RouteError::MissingCredentials => Self::Internal(err.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::NotPermitted(_) => Self::Conflict(err.to_string()),
            DomainError::InvalidCoordinates(_)
            | DomainError::InvalidPhoneNumber(_)
            | DomainError::InvalidTravelMode(_)
            | DomainError::ValidationError(_) => Self::BadRequest(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::TravelMode;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn route_errors_map_to_statuses() {
        assert_eq!(
            status_of(RouteError::AddressNotFound("Rue X".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(RouteError::NoRouteAvailable),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(RouteError::GeocodingService("HTTP 500".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(RouteError::DirectionsService {
                mode: TravelMode::Driving,
                message: "HTTP 503".into(),
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(RouteError::MissingCredentials),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(
            status_of(DomainError::ValidationError("name".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::InvalidCoordinates("lat 91".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::NotPermitted("cannot cancel".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::not_found("Booking", "abc")),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn application_errors_map_to_statuses() {
        assert_eq!(
            status_of(ApplicationError::NotAuthorized("no user".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApplicationError::NotFound("booking".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApplicationError::ExternalService("down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ApplicationError::Configuration("bad".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApplicationError::Route(RouteError::NoRouteAvailable)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn error_response_omits_missing_details() {
        let resp = ErrorResponse {
            error: "Bad request".to_string(),
            code: "bad_request".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"code\":\"bad_request\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn sanitize_hides_paths_and_urls() {
        assert_eq!(
            sanitize_with("Error loading /home/user/config.toml", false),
            GENERIC_MESSAGE
        );
        assert_eq!(
            sanitize_with("GET https://api.mapbox.com/x?access_token=pk failed", false),
            GENERIC_MESSAGE
        );
    }

    #[test]
    fn sanitize_keeps_safe_messages() {
        assert_eq!(
            sanitize_with("Address not found: Rue X, Kinshasa, RDC", false),
            "Address not found: Rue X, Kinshasa, RDC"
        );
    }

    #[test]
    fn sanitize_exposes_everything_in_development() {
        let msg = "Error at /home/user/config.toml";
        assert_eq!(sanitize_with(msg, true), msg);
    }
}
