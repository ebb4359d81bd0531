//! Mapbox forward geocoding
//!
//! Calls `geocoding/v5/mapbox.places/{query}.json` and returns matches in
//! relevance order. An empty match list is a valid answer, not an error.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::client::MapboxClient;
use crate::error::MapboxError;
use crate::models::{GeocodeQuery, Place, RawFeatureCollection};

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Resolve free text to candidate places, best match first
    async fn forward_geocode(&self, query: &GeocodeQuery) -> Result<Vec<Place>, MapboxError>;
}

impl MapboxClient {
    /// Parse a geocoding response body
    fn parse_feature_collection(body: &str) -> Result<Vec<Place>, MapboxError> {
        let raw: RawFeatureCollection =
            serde_json::from_str(body).map_err(|e| MapboxError::ParseError(e.to_string()))?;

        raw.features.into_iter().map(Place::try_from).collect()
    }
}

#[async_trait]
impl GeocodingClient for MapboxClient {
    #[instrument(skip_all, fields(text = %query.text, limit = query.limit))]
    async fn forward_geocode(&self, query: &GeocodeQuery) -> Result<Vec<Place>, MapboxError> {
        let token = self.access_token()?;

        let text = query.text.trim();
        if text.is_empty() {
            return Err(MapboxError::InvalidRequest(
                "Search text must not be empty".to_string(),
            ));
        }

        // ';' separates batch queries on this endpoint
        let segment = format!("{}.json", text.replace(';', ","));
        let url = self.endpoint(&["geocoding", "v5", "mapbox.places", &segment])?;

        let country = query.country.as_deref().unwrap_or(&self.config.country);
        let mut params: Vec<(&str, String)> = vec![
            ("access_token", token.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if !country.is_empty() {
            params.push(("country", country.to_string()));
        }
        if let Some(proximity) = query.proximity {
            params.push((
                "proximity",
                format!("{},{}", proximity.longitude(), proximity.latitude()),
            ));
        }
        if !self.config.language.is_empty() {
            params.push(("language", self.config.language.clone()));
        }

        let body = self.get(url, &params).await?;
        let places = Self::parse_feature_collection(&body)?;

        debug!(count = places.len(), "Geocoding matches");
        Ok(places)
    }
}
