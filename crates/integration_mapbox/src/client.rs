//! Shared Mapbox HTTP client
//!
//! One `reqwest::Client` (and its connection pool) serves both the
//! geocoding and the directions endpoints.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::debug;
use url::Url;

use crate::config::MapboxConfig;
use crate::error::MapboxError;
use crate::models::RawErrorBody;

/// Mapbox API client implementing [`GeocodingClient`](crate::GeocodingClient)
/// and [`DirectionsClient`](crate::DirectionsClient)
#[derive(Debug)]
pub struct MapboxClient {
    pub(crate) client: Client,
    pub(crate) config: MapboxConfig,
    base_url: Url,
}

impl MapboxClient {
    /// Create a new Mapbox client
    ///
    /// A client without an access token can be built; every request then
    /// fails with [`MapboxError::MissingAccessToken`] before touching the
    /// network.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be initialized.
    pub fn new(config: &MapboxConfig) -> Result<Self, MapboxError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| MapboxError::InvalidRequest(format!("invalid base_url: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("Mwinda/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MapboxError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            base_url,
        })
    }

    /// Whether requests can be authenticated
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.config.has_access_token()
    }

    /// The access token, or `MissingAccessToken`
    pub(crate) fn access_token(&self) -> Result<&str, MapboxError> {
        self.config
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(MapboxError::MissingAccessToken)
    }

    /// Build an endpoint URL from path segments, percent-encoding each one
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, MapboxError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MapboxError::InvalidRequest("base_url cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a GET request and return the body of a successful response
    pub(crate) async fn get(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<String, MapboxError> {
        debug!(path = %url.path(), "Calling Mapbox");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MapboxError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    MapboxError::ConnectionFailed(e.to_string())
                }
            })?;

        let response = Self::check_status(response).await?;

        response
            .text()
            .await
            .map_err(|e| MapboxError::ParseError(e.to_string()))
    }

    /// Map non-success statuses to errors
    async fn check_status(response: Response) -> Result<Response, MapboxError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MapboxError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<RawErrorBody>(&body).ok())
            .and_then(|b| b.message);
        let detail = message.map_or_else(
            || format!("HTTP {status}"),
            |m| format!("HTTP {status}: {m}"),
        );

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(MapboxError::Unauthorized(detail))
            },
            StatusCode::UNPROCESSABLE_ENTITY => Err(MapboxError::InvalidRequest(detail)),
            _ => Err(MapboxError::RequestFailed(detail)),
        }
    }
}
