//! Mapbox request and response models
//!
//! Typed views over the geocoding `FeatureCollection` and the directions
//! response, plus the raw serde shapes they are decoded from.

use domain::{Coordinate, RoutePath};
use serde::{Deserialize, Serialize};

use crate::error::MapboxError;

/// A forward geocoding request
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeQuery {
    /// Free-text search
    pub text: String,
    /// Country filter override; the configured country is used when `None`
    pub country: Option<String>,
    /// Point to bias results toward
    pub proximity: Option<Coordinate>,
    /// Maximum number of results
    pub limit: u8,
}

impl GeocodeQuery {
    /// A query for the single best match
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            country: None,
            proximity: None,
            limit: 1,
        }
    }

    /// Bias results toward a point
    #[must_use]
    pub const fn with_proximity(mut self, proximity: Coordinate) -> Self {
        self.proximity = Some(proximity);
        self
    }

    /// Restrict to a country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Change the result limit
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit;
        self
    }
}

/// A geocoding match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Mapbox feature id
    pub id: String,
    /// Full display name
    pub place_name: String,
    /// Position of the match
    pub center: Coordinate,
    /// Feature types of the match
    pub place_types: Vec<String>,
    /// Relevance score in [0, 1]
    pub relevance: Option<f64>,
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeatureCollection {
    #[serde(default)]
    pub(crate) features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeature {
    #[serde(default)]
    id: String,
    #[serde(default)]
    place_name: String,
    center: [f64; 2],
    #[serde(default)]
    place_type: Vec<String>,
    relevance: Option<f64>,
}

impl TryFrom<RawFeature> for Place {
    type Error = MapboxError;

    fn try_from(raw: RawFeature) -> Result<Self, Self::Error> {
        let [lon, lat] = raw.center;
        let center =
            Coordinate::new(lon, lat).map_err(|e| MapboxError::ParseError(e.to_string()))?;
        Ok(Self {
            id: raw.id,
            place_name: raw.place_name,
            center,
            place_types: raw.place_type,
            relevance: raw.relevance,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDirectionsResponse {
    pub(crate) code: String,
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoute {
    distance: f64,
    duration: f64,
    geometry: RawLineString,
}

#[derive(Debug, Deserialize)]
struct RawLineString {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<[f64; 2]>,
}

impl TryFrom<RawRoute> for RoutePath {
    type Error = MapboxError;

    fn try_from(raw: RawRoute) -> Result<Self, Self::Error> {
        if raw.geometry.kind != "LineString" {
            return Err(MapboxError::ParseError(format!(
                "unexpected geometry type {}",
                raw.geometry.kind
            )));
        }
        let geometry = raw
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinate::new(lon, lat))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MapboxError::ParseError(e.to_string()))?;
        Ok(Self::new(raw.distance, raw.duration, geometry))
    }
}

/// Error payload returned by Mapbox on failures
#[derive(Debug, Deserialize)]
pub(crate) struct RawErrorBody {
    pub(crate) message: Option<String>,
}
