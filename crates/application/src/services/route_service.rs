//! Route resolution service
//!
//! Resolves both endpoints of a trip, fetches driving and walking routes
//! concurrently and selects the result to show: driving when it succeeded,
//! walking otherwise.

use std::sync::Arc;

use domain::{Coordinate, LocationInput, ResolvedRoute, RoutePath, RouteResult, TravelMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{ApplicationError, RouteError};
use crate::ports::{DirectionsPort, GeocodingPort, GeocodingRequest};

/// Metropolitan area free-text addresses are biased toward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetroArea {
    /// City name appended to addresses (default: "Kinshasa")
    #[serde(default = "default_name")]
    pub name: String,
    /// Short country name appended after the city (default: "RDC")
    #[serde(default = "default_country_label")]
    pub country_label: String,
    /// ISO 3166 alpha-2 code the geocoder is restricted to (default: "CD")
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Point geocoding results are biased toward
    #[serde(default = "Coordinate::kinshasa")]
    pub center: Coordinate,
    /// Number of geocoding matches requested (default: 1)
    #[serde(default = "default_limit")]
    pub limit: u8,
}

fn default_name() -> String {
    "Kinshasa".to_string()
}

fn default_country_label() -> String {
    "RDC".to_string()
}

fn default_country_code() -> String {
    "CD".to_string()
}

const fn default_limit() -> u8 {
    1
}

impl Default for MetroArea {
    fn default() -> Self {
        Self {
            name: default_name(),
            country_label: default_country_label(),
            country_code: default_country_code(),
            center: Coordinate::kinshasa(),
            limit: default_limit(),
        }
    }
}

impl MetroArea {
    /// Append the metro area to an address that does not mention it
    ///
    /// The check is a case-insensitive substring match on the city name or
    /// the country label.
    #[must_use]
    pub fn bias_query(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let mentions_area = lower.contains(&self.name.to_lowercase())
            || lower.contains(&self.country_label.to_lowercase());
        if mentions_area {
            text.to_string()
        } else {
            format!("{text}, {}, {}", self.name, self.country_label)
        }
    }
}

/// Service resolving a departure/arrival pair into a route
pub struct RouteService {
    geocoding: Arc<dyn GeocodingPort>,
    directions: Arc<dyn DirectionsPort>,
    metro: MetroArea,
}

impl std::fmt::Debug for RouteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteService")
            .field("geocoding", &"<GeocodingPort>")
            .field("directions", &"<DirectionsPort>")
            .field("metro", &self.metro)
            .finish()
    }
}

impl RouteService {
    /// Create a route service biased toward Kinshasa
    #[must_use]
    pub fn new(geocoding: Arc<dyn GeocodingPort>, directions: Arc<dyn DirectionsPort>) -> Self {
        Self {
            geocoding,
            directions,
            metro: MetroArea::default(),
        }
    }

    /// Use a different metropolitan area
    #[must_use]
    pub fn with_metro_area(mut self, metro: MetroArea) -> Self {
        self.metro = metro;
        self
    }

    /// The configured metropolitan area
    #[must_use]
    pub const fn metro_area(&self) -> &MetroArea {
        &self.metro
    }

    /// Whether both vendor ports have credentials configured
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.geocoding.has_credentials() && self.directions.has_credentials()
    }

    fn ensure_credentials(&self) -> Result<(), ApplicationError> {
        if self.has_credentials() {
            Ok(())
        } else {
            Err(RouteError::MissingCredentials.into())
        }
    }

    /// Parse two raw endpoints and resolve the route between them
    ///
    /// # Errors
    ///
    /// Returns a domain error for unparseable input, otherwise the errors of
    /// [`Self::compute_route`].
    pub async fn resolve_route(
        &self,
        departure: &str,
        arrival: &str,
    ) -> Result<ResolvedRoute, ApplicationError> {
        let departure = LocationInput::parse(departure)?;
        let arrival = LocationInput::parse(arrival)?;
        self.compute_route(&departure, &arrival).await
    }

    /// Resolve the route between two endpoints
    ///
    /// Departure is resolved before arrival; a resolution failure ends the
    /// attempt before any directions call.
    ///
    /// # Errors
    ///
    /// - `MissingCredentials` when the vendor is not configured
    /// - `AddressNotFound` / `GeocodingService` from address resolution
    /// - `NoRouteAvailable` when neither driving nor walking succeeded
    #[instrument(skip_all, fields(departure = %departure, arrival = %arrival))]
    pub async fn compute_route(
        &self,
        departure: &LocationInput,
        arrival: &LocationInput,
    ) -> Result<ResolvedRoute, ApplicationError> {
        self.ensure_credentials()?;

        let from = self.resolve_location(departure).await?;
        let to = self.resolve_location(arrival).await?;

        let (driving, walking) = tokio::join!(
            self.fetch_route(from, to, TravelMode::Driving),
            self.fetch_route(from, to, TravelMode::Walking),
        );

        let result = select_route(driving, walking)?;
        info!(
            mode = %result.mode(),
            distance_m = result.distance_m(),
            duration_s = result.duration_s(),
            "Route resolved"
        );

        Ok(ResolvedRoute {
            departure: from,
            arrival: to,
            result,
        })
    }

    /// Turn an endpoint into a coordinate
    ///
    /// Raw coordinates are returned as-is; free text is geocoded with the
    /// metro-area bias and the best match is used.
    ///
    /// # Errors
    ///
    /// Returns `AddressNotFound` when the geocoder has no match, or the
    /// geocoding port's error.
    #[instrument(skip_all, fields(input = %input))]
    pub async fn resolve_location(
        &self,
        input: &LocationInput,
    ) -> Result<Coordinate, ApplicationError> {
        let text = match input {
            LocationInput::Coordinate(coordinate) => return Ok(*coordinate),
            LocationInput::FreeText(text) => text,
        };

        let request = GeocodingRequest {
            query: self.metro.bias_query(text),
            country: self.metro.country_code.clone(),
            proximity: self.metro.center,
            limit: self.metro.limit,
        };

        let places = self.geocoding.geocode(&request).await?;
        let Some(best) = places.into_iter().next() else {
            debug!(query = %request.query, "No geocoding match");
            return Err(RouteError::AddressNotFound(text.clone()).into());
        };

        debug!(place = %best.name, coordinate = %best.coordinate, "Address resolved");
        Ok(best.coordinate)
    }

    /// Fetch one route, correcting implausible walking durations
    ///
    /// # Errors
    ///
    /// Returns the directions port's error.
    pub async fn fetch_route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<RoutePath, ApplicationError> {
        let path = self.directions.fetch_route(from, to, mode).await?;
        Ok(match mode {
            TravelMode::Walking => path.with_walking_correction(),
            TravelMode::Driving => path,
        })
    }
}

/// Pick the route to show from the two attempts
fn select_route(
    driving: Result<RoutePath, ApplicationError>,
    walking: Result<RoutePath, ApplicationError>,
) -> Result<RouteResult, ApplicationError> {
    match (driving, walking) {
        (Ok(route), walking) => {
            let walking_duration_s = match walking {
                Ok(path) => Some(path.duration_s),
                Err(e) => {
                    debug!(error = %e, "Walking route unavailable");
                    None
                }
            };
            Ok(RouteResult::Driving {
                route,
                walking_duration_s,
            })
        },
        (Err(driving_err), Ok(route)) => {
            warn!(error = %driving_err, "Driving route failed, falling back to walking");
            Ok(RouteResult::Walking { route })
        },
        (Err(driving_err), Err(walking_err)) => {
            warn!(
                driving_error = %driving_err,
                walking_error = %walking_err,
                "No route available"
            );
            Err(RouteError::NoRouteAvailable.into())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{GeocodedPlace, MockDirectionsPort, MockGeocodingPort};

    fn gombe() -> Coordinate {
        Coordinate::new_unchecked(15.3136, -4.304)
    }

    fn limete() -> Coordinate {
        Coordinate::new_unchecked(15.35, -4.335)
    }

    fn directions_error(mode: TravelMode) -> ApplicationError {
        RouteError::DirectionsService {
            mode,
            message: "HTTP 503".to_string(),
        }
        .into()
    }

    fn geocoder() -> MockGeocodingPort {
        let mut mock = MockGeocodingPort::new();
        mock.expect_has_credentials().return_const(true);
        mock
    }

    fn directions(
        driving: Result<(f64, f64), ()>,
        walking: Result<(f64, f64), ()>,
    ) -> MockDirectionsPort {
        let mut mock = MockDirectionsPort::new();
        mock.expect_has_credentials().return_const(true);
        mock.expect_fetch_route()
            .times(2)
            .returning(move |from, to, mode| {
                let outcome = match mode {
                    TravelMode::Driving => driving,
                    TravelMode::Walking => walking,
                };
                outcome
                    .map(|(distance, duration)| RoutePath::new(distance, duration, vec![from, to]))
                    .map_err(|()| directions_error(mode))
            });
        mock
    }

    fn service(geocoding: MockGeocodingPort, directions: MockDirectionsPort) -> RouteService {
        RouteService::new(Arc::new(geocoding), Arc::new(directions))
    }

    fn coords(from: Coordinate, to: Coordinate) -> (LocationInput, LocationInput) {
        (LocationInput::Coordinate(from), LocationInput::Coordinate(to))
    }

    #[test]
    fn bias_appends_metro_area() {
        let metro = MetroArea::default();
        assert_eq!(metro.bias_query("Gombe"), "Gombe, Kinshasa, RDC");
    }

    #[test]
    fn bias_keeps_addresses_mentioning_the_area() {
        let metro = MetroArea::default();
        assert_eq!(metro.bias_query("Gombe, KINSHASA"), "Gombe, KINSHASA");
        assert_eq!(metro.bias_query("Limete rdc"), "Limete rdc");
    }

    #[test]
    fn metro_area_deserializes_with_defaults() {
        let metro: MetroArea = serde_json::from_str(r#"{"name": "Lubumbashi"}"#).unwrap();
        assert_eq!(metro.name, "Lubumbashi");
        assert_eq!(metro.country_code, "CD");
        assert_eq!(metro.limit, 1);
    }

    #[tokio::test]
    async fn raw_coordinates_skip_geocoding() {
        let mut geocoding = geocoder();
        geocoding.expect_geocode().never();
        let service = service(geocoding, directions(Ok((5000.0, 600.0)), Ok((5000.0, 3600.0))));

        let route = service
            .resolve_route("-4.304,15.3136", "-4.335, 15.35")
            .await
            .unwrap();

        assert_eq!(route.departure, gombe());
        assert_eq!(route.arrival, limete());
    }

    #[tokio::test]
    async fn free_text_is_biased_and_restricted() {
        let mut geocoding = geocoder();
        geocoding
            .expect_geocode()
            .withf(|request: &GeocodingRequest| {
                request.query == "Gombe, Kinshasa, RDC"
                    && request.country == "CD"
                    && request.proximity == Coordinate::kinshasa()
                    && request.limit == 1
            })
            .times(1)
            .returning(|_| {
                Ok(vec![GeocodedPlace {
                    name: "Gombe, Kinshasa".to_string(),
                    coordinate: gombe(),
                }])
            });
        let service = service(geocoding, MockDirectionsPort::new());

        let coordinate = service
            .resolve_location(&LocationInput::FreeText("Gombe".to_string()))
            .await
            .unwrap();
        assert_eq!(coordinate, gombe());
    }

    #[tokio::test]
    async fn first_geocoding_match_wins() {
        let mut geocoding = geocoder();
        geocoding.expect_geocode().returning(|_| {
            Ok(vec![
                GeocodedPlace {
                    name: "Limete".to_string(),
                    coordinate: limete(),
                },
                GeocodedPlace {
                    name: "Gombe".to_string(),
                    coordinate: gombe(),
                },
            ])
        });
        let service = service(geocoding, MockDirectionsPort::new());

        let coordinate = service
            .resolve_location(&LocationInput::FreeText("Limete".to_string()))
            .await
            .unwrap();
        assert_eq!(coordinate, limete());
    }

    #[tokio::test]
    async fn unknown_address_stops_before_directions() {
        let mut geocoding = geocoder();
        geocoding.expect_geocode().times(1).returning(|_| Ok(vec![]));
        let mut directions = MockDirectionsPort::new();
        directions.expect_has_credentials().return_const(true);
        directions.expect_fetch_route().never();
        let service = service(geocoding, directions);

        let err = service
            .resolve_route("Nowhere street", "-4.335,15.35")
            .await
            .unwrap_err();

        assert_eq!(
            err.as_route_error(),
            Some(&RouteError::AddressNotFound("Nowhere street".to_string()))
        );
    }

    #[tokio::test]
    async fn geocoding_failure_propagates() {
        let mut geocoding = geocoder();
        geocoding
            .expect_geocode()
            .returning(|_| Err(RouteError::GeocodingService("HTTP 500".to_string()).into()));
        let mut directions = MockDirectionsPort::new();
        directions.expect_has_credentials().return_const(true);
        directions.expect_fetch_route().never();
        let service = service(geocoding, directions);

        let err = service
            .resolve_route("Gombe", "Limete")
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_route_error(),
            Some(RouteError::GeocodingService(_))
        ));
    }

    #[tokio::test]
    async fn driving_preferred_when_both_succeed() {
        let service = service(geocoder(), directions(Ok((5000.0, 600.0)), Ok((2000.0, 1800.0))));
        let (from, to) = coords(gombe(), limete());

        let route = service.compute_route(&from, &to).await.unwrap();

        assert_eq!(route.result.mode(), TravelMode::Driving);
        assert!((route.result.duration_s() - 600.0).abs() < f64::EPSILON);
        assert_eq!(route.result.driving_duration_s(), Some(600.0));
        assert_eq!(route.result.walking_duration_s(), Some(1800.0));
        assert_eq!(route.result.geometry(), &[gombe(), limete()]);
    }

    #[tokio::test]
    async fn walking_fallback_has_no_driving_duration() {
        let service = service(geocoder(), directions(Err(()), Ok((2000.0, 1600.0))));
        let (from, to) = coords(gombe(), limete());

        let route = service.compute_route(&from, &to).await.unwrap();

        assert_eq!(route.result.mode(), TravelMode::Walking);
        assert!((route.result.duration_s() - 1600.0).abs() < f64::EPSILON);
        assert!((route.result.distance_m() - 2000.0).abs() < f64::EPSILON);
        assert_eq!(route.result.driving_duration_s(), None);
    }

    #[tokio::test]
    async fn both_modes_failing_is_no_route() {
        let service = service(geocoder(), directions(Err(()), Err(())));
        let (from, to) = coords(gombe(), limete());

        let err = service.compute_route(&from, &to).await.unwrap_err();
        assert_eq!(err.as_route_error(), Some(&RouteError::NoRouteAvailable));
    }

    #[tokio::test]
    async fn implausible_walking_speed_is_recomputed() {
        // 3000 m in 600 s is 18 km/h
        let service = service(geocoder(), directions(Err(()), Ok((3000.0, 600.0))));
        let (from, to) = coords(gombe(), limete());

        let route = service.compute_route(&from, &to).await.unwrap();

        assert_eq!(route.result.mode(), TravelMode::Walking);
        assert!((route.result.duration_s() - 2400.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn driving_duration_is_never_corrected() {
        let service = service(geocoder(), directions(Ok((3000.0, 60.0)), Err(())));
        let (from, to) = coords(gombe(), limete());

        let route = service.compute_route(&from, &to).await.unwrap();

        assert_eq!(route.result.driving_duration_s(), Some(60.0));
        assert_eq!(route.result.walking_duration_s(), None);
    }

    #[tokio::test]
    async fn missing_credentials_checked_before_any_call() {
        let mut geocoding = MockGeocodingPort::new();
        geocoding.expect_has_credentials().return_const(false);
        geocoding.expect_geocode().never();
        let mut directions = MockDirectionsPort::new();
        directions.expect_has_credentials().return_const(false);
        directions.expect_fetch_route().never();
        let service = service(geocoding, directions);

        let err = service.resolve_route("Gombe", "Limete").await.unwrap_err();
        assert_eq!(err.as_route_error(), Some(&RouteError::MissingCredentials));
    }

    #[tokio::test]
    async fn invalid_input_is_a_domain_error() {
        let service = service(MockGeocodingPort::new(), MockDirectionsPort::new());

        let err = service.resolve_route("  ", "Limete").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(_)));

        let err = service.resolve_route("95.0,15.0", "Limete").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }
}
