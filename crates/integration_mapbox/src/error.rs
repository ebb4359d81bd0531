//! Mapbox error types

use thiserror::Error;

/// Errors that can occur when calling the Mapbox APIs
#[derive(Debug, Error)]
pub enum MapboxError {
    /// No access token configured; raised before any request is sent
    #[error("Mapbox access token is not configured")]
    MissingAccessToken,

    /// Connection to Mapbox failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Mapbox answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The access token was rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse the response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Directions returned no route for the profile
    #[error("No {profile} route found: {reason}")]
    NoRoute {
        /// Routing profile (driving, walking)
        profile: String,
        /// Vendor status code or explanation
        reason: String,
    },

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl MapboxError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }

    /// Returns true if the error comes from missing or rejected credentials
    #[must_use]
    pub const fn is_credentials_error(&self) -> bool {
        matches!(self, Self::MissingAccessToken | Self::Unauthorized(_))
    }
}
