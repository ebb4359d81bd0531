//! Mapbox adapter - Implements GeocodingPort and DirectionsPort using integration_mapbox

use application::error::{ApplicationError, RouteError};
use application::ports::{DirectionsPort, GeocodedPlace, GeocodingPort, GeocodingRequest};
use async_trait::async_trait;
use domain::{Coordinate, RoutePath, TravelMode};
use integration_mapbox::{
    DirectionsClient, GeocodeQuery, GeocodingClient, MapboxClient, MapboxConfig, MapboxError,
};
use tracing::{debug, instrument, warn};

/// Adapter for address geocoding and routing through Mapbox
#[derive(Debug)]
pub struct MapboxAdapter {
    client: MapboxClient,
}

impl MapboxAdapter {
    /// Create a new Mapbox adapter
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client fails to initialize.
    pub fn new(config: &MapboxConfig) -> Result<Self, ApplicationError> {
        let client = MapboxClient::new(config)
            .map_err(|e| ApplicationError::Configuration(format!("Mapbox client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    #[must_use]
    pub const fn with_client(client: MapboxClient) -> Self {
        Self { client }
    }

    fn map_geocoding_error(e: MapboxError) -> ApplicationError {
        match e {
            MapboxError::MissingAccessToken => RouteError::MissingCredentials.into(),
            other => {
                warn!(error = %other, retryable = other.is_retryable(), "Geocoding failed");
                RouteError::GeocodingService(other.to_string()).into()
            },
        }
    }

    fn map_directions_error(e: MapboxError, mode: TravelMode) -> ApplicationError {
        match e {
            MapboxError::MissingAccessToken => RouteError::MissingCredentials.into(),
            other => {
                debug!(error = %other, %mode, "Directions failed");
                RouteError::DirectionsService {
                    mode,
                    message: other.to_string(),
                }
                .into()
            },
        }
    }
}

#[async_trait]
impl GeocodingPort for MapboxAdapter {
    #[instrument(skip(self, request), fields(query = %request.query))]
    async fn geocode(
        &self,
        request: &GeocodingRequest,
    ) -> Result<Vec<GeocodedPlace>, ApplicationError> {
        let query = GeocodeQuery::new(&request.query)
            .with_country(request.country.to_lowercase())
            .with_proximity(request.proximity)
            .with_limit(request.limit);

        let places = self
            .client
            .forward_geocode(&query)
            .await
            .map_err(Self::map_geocoding_error)?;

        debug!(count = places.len(), "Geocoding completed");
        Ok(places
            .into_iter()
            .map(|place| GeocodedPlace {
                name: place.place_name,
                coordinate: place.center,
            })
            .collect())
    }

    fn has_credentials(&self) -> bool {
        self.client.has_access_token()
    }
}

#[async_trait]
impl DirectionsPort for MapboxAdapter {
    #[instrument(skip(self))]
    async fn fetch_route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<RoutePath, ApplicationError> {
        self.client
            .route(from, to, mode)
            .await
            .map_err(|e| Self::map_directions_error(e, mode))
    }

    fn has_credentials(&self) -> bool {
        self.client.has_access_token()
    }
}
