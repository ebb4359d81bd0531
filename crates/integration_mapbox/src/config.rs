//! Mapbox client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Mapbox geocoding and directions APIs
#[derive(Clone, Serialize, Deserialize)]
pub struct MapboxConfig {
    /// Base URL for the Mapbox API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Public access token (`pk.*`)
    #[serde(default)]
    pub access_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// ISO 3166 alpha-2 country filter for geocoding
    #[serde(default = "default_country")]
    pub country: String,

    /// Language for place names
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_country() -> String {
    "cd".to_string()
}

fn default_language() -> String {
    "fr".to_string()
}

impl Default for MapboxConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
            country: default_country(),
            language: default_language(),
        }
    }
}

impl std::fmt::Debug for MapboxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("country", &self.country)
            .field("language", &self.language)
            .finish()
    }
}

impl MapboxConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            access_token: Some("pk.test-token".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Whether a non-blank access token is present
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.access_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Validate the configuration
    ///
    /// A missing token is not a validation error: the client reports it per
    /// request so that the service can still start and report readiness.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("base_url is not a valid URL: {}", self.base_url));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.country.len() != 2 {
            return Err("country must be a two-letter code".to_string());
        }

        Ok(())
    }
}
