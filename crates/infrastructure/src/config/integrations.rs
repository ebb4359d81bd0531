//! External integration configuration: Mapbox and driver dispatch.

use application::MetroArea;
use domain::{Coordinate, DomainError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Mapbox geocoding and directions configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct MapboxAppConfig {
    /// Base URL for the Mapbox API
    #[serde(default = "default_mapbox_base_url")]
    pub base_url: String,

    /// Access token (sensitive - uses SecretString)
    ///
    /// Falls back to `MAPBOX_ACCESS_TOKEN` when unset.
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_mapbox_timeout")]
    pub timeout_secs: u64,

    /// Language for place names (default: fr)
    #[serde(default = "default_language")]
    pub language: String,

    /// ISO 3166 alpha-2 country geocoding is restricted to (default: CD)
    #[serde(default = "default_country")]
    pub country: String,

    /// City appended to addresses that do not mention it (default: Kinshasa)
    #[serde(default = "default_metro_name")]
    pub metro_name: String,

    /// Country label appended after the city (default: RDC)
    #[serde(default = "default_country_label")]
    pub country_label: String,

    /// Longitude geocoding is biased toward
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,

    /// Latitude geocoding is biased toward
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
}

impl std::fmt::Debug for MapboxAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxAppConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("language", &self.language)
            .field("country", &self.country)
            .field("metro_name", &self.metro_name)
            .field("country_label", &self.country_label)
            .field("center_longitude", &self.center_longitude)
            .field("center_latitude", &self.center_latitude)
            .finish()
    }
}

fn default_mapbox_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

const fn default_mapbox_timeout() -> u64 {
    10
}

fn default_language() -> String {
    "fr".to_string()
}

fn default_country() -> String {
    "CD".to_string()
}

fn default_metro_name() -> String {
    "Kinshasa".to_string()
}

fn default_country_label() -> String {
    "RDC".to_string()
}

const fn default_center_longitude() -> f64 {
    15.3369
}

const fn default_center_latitude() -> f64 {
    -4.3317
}

impl Default for MapboxAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_mapbox_base_url(),
            access_token: None,
            timeout_secs: default_mapbox_timeout(),
            language: default_language(),
            country: default_country(),
            metro_name: default_metro_name(),
            country_label: default_country_label(),
            center_longitude: default_center_longitude(),
            center_latitude: default_center_latitude(),
        }
    }
}

impl MapboxAppConfig {
    /// Whether a non-empty access token is configured
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.access_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().trim().is_empty())
    }

    /// Convert to the Mapbox client configuration
    #[must_use]
    pub fn to_mapbox_config(&self) -> integration_mapbox::MapboxConfig {
        integration_mapbox::MapboxConfig {
            base_url: self.base_url.clone(),
            access_token: self
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            timeout_secs: self.timeout_secs,
            country: self.country.to_lowercase(),
            language: self.language.clone(),
        }
    }

    /// Metropolitan area used to bias free-text addresses
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` when the configured center is outside
    /// the WGS84 range.
    pub fn to_metro_area(&self) -> Result<MetroArea, DomainError> {
        Ok(MetroArea {
            name: self.metro_name.clone(),
            country_label: self.country_label.clone(),
            country_code: self.country.to_uppercase(),
            center: Coordinate::new(self.center_longitude, self.center_latitude)?,
            ..MetroArea::default()
        })
    }
}

/// Simulated driver dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Simulated time spent searching for a driver in milliseconds
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
}

const fn default_search_delay_ms() -> u64 {
    2000
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            search_delay_ms: default_search_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_kinshasa() {
        let config = MapboxAppConfig::default();
        let metro = config.to_metro_area().unwrap();

        assert_eq!(metro, MetroArea::default());
        assert!(!config.has_access_token());
    }

    #[test]
    fn client_config_carries_token_and_lowercase_country() {
        let config = MapboxAppConfig {
            access_token: Some(SecretString::from("pk.abc".to_string())),
            ..MapboxAppConfig::default()
        };

        let client = config.to_mapbox_config();
        assert_eq!(client.access_token.as_deref(), Some("pk.abc"));
        assert_eq!(client.country, "cd");
        assert_eq!(client.timeout_secs, 10);
    }

    #[test]
    fn invalid_center_is_rejected() {
        let config = MapboxAppConfig {
            center_latitude: -120.0,
            ..MapboxAppConfig::default()
        };
        assert!(matches!(
            config.to_metro_area(),
            Err(DomainError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let config = MapboxAppConfig {
            access_token: Some(SecretString::from("pk.secret".to_string())),
            ..MapboxAppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("pk.secret"));
    }

    #[test]
    fn dispatch_default_delay() {
        assert_eq!(DispatchConfig::default().search_delay_ms, 2000);
    }
}
