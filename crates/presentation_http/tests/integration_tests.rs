//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{collections::HashMap, sync::Arc};

use application::{
    ApplicationError, BookingService, DirectionsPort, GeocodedPlace, GeocodingPort,
    GeocodingRequest, HealthService, RouteError, RouteService,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use domain::{Coordinate, Driver, RoutePath, TravelMode};
use infrastructure::{
    AppConfig, ApiKeyHasher, DatabaseConfig, DispatchConfig, SimulatedDispatchAdapter,
    SqliteBookingStore, SqliteDatabaseHealth, config::ApiKeyEntry, create_pool,
};
use presentation_http::{build_app, state::AppState};
use serde_json::{Value, json};

const API_KEY: &str = "mw-test-key";
const OWNER: &str = "550e8400-e29b-41d4-a716-446655440001";
const OTHER_KEY: &str = "mw-other-key";
const OTHER: &str = "550e8400-e29b-41d4-a716-446655440002";

/// Geocoder answering from a fixed gazetteer
struct FakeGeocoder {
    places: HashMap<&'static str, Coordinate>,
    configured: bool,
}

impl FakeGeocoder {
    fn kinshasa() -> Self {
        let places = HashMap::from([
            ("Gombe", Coordinate::new_unchecked(15.3136, -4.3040)),
            ("Limete", Coordinate::new_unchecked(15.3460, -4.3560)),
        ]);
        Self {
            places,
            configured: true,
        }
    }
}

#[async_trait]
impl GeocodingPort for FakeGeocoder {
    async fn geocode(
        &self,
        request: &GeocodingRequest,
    ) -> Result<Vec<GeocodedPlace>, ApplicationError> {
        Ok(self
            .places
            .iter()
            .filter(|(name, _)| request.query.starts_with(*name))
            .map(|(name, coordinate)| GeocodedPlace {
                name: (*name).to_string(),
                coordinate: *coordinate,
            })
            .collect())
    }

    fn has_credentials(&self) -> bool {
        self.configured
    }
}

/// Directions service with a fixed answer per mode
struct FakeDirections {
    driving_available: bool,
    configured: bool,
}

#[async_trait]
impl DirectionsPort for FakeDirections {
    async fn fetch_route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<RoutePath, ApplicationError> {
        match mode {
            TravelMode::Driving if self.driving_available => {
                Ok(RoutePath::new(5000.0, 900.0, vec![from, to]))
            },
            TravelMode::Driving => Err(RouteError::DirectionsService {
                mode,
                message: "HTTP 503".to_string(),
            }
            .into()),
            TravelMode::Walking => Ok(RoutePath::new(4800.0, 3840.0, vec![from, to])),
        }
    }

    fn has_credentials(&self) -> bool {
        self.configured
    }
}

struct Setup {
    config: AppConfig,
    driving_available: bool,
    configured: bool,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            driving_available: true,
            configured: true,
        }
    }
}

impl Setup {
    fn with_api_key(mut self) -> Self {
        let hasher = ApiKeyHasher::new();
        self.config.security.api_keys = vec![
            ApiKeyEntry {
                hash: hasher.hash(API_KEY).unwrap(),
                user_id: OWNER.to_string(),
            },
            ApiKeyEntry {
                hash: hasher.hash(OTHER_KEY).unwrap(),
                user_id: OTHER.to_string(),
            },
        ];
        self
    }

    fn server(self) -> TestServer {
        let routes = Arc::new(RouteService::new(
            Arc::new(FakeGeocoder {
                configured: self.configured,
                ..FakeGeocoder::kinshasa()
            }),
            Arc::new(FakeDirections {
                driving_available: self.driving_available,
                configured: self.configured,
            }),
        ));

        let pool = Arc::new(create_pool(&DatabaseConfig::in_memory()).unwrap());
        let dispatch = SimulatedDispatchAdapter::with_roster(
            vec![Driver::demo_roster().remove(0)],
            &DispatchConfig { search_delay_ms: 0 },
        );

        let bookings = BookingService::new(
            Arc::clone(&routes),
            Arc::new(SqliteBookingStore::new(Arc::clone(&pool))),
            Arc::new(dispatch),
        );
        let health = HealthService::new(Arc::clone(&routes))
            .with_database(Arc::new(SqliteDatabaseHealth::new(pool)));

        let state = AppState {
            route_service: routes,
            booking_service: Arc::new(bookings),
            health_service: Arc::new(health),
            config: Arc::new(self.config),
        };
        TestServer::new(build_app(state)).expect("Failed to create test server")
    }
}

fn create_test_server() -> TestServer {
    Setup::default().server()
}

fn booking_form() -> Value {
    json!({
        "name": "Mbuyi Kalala",
        "phone": "+243 81 234 5678",
        "departure": "Gombe",
        "arrival": "Limete"
    })
}

async fn create_booking(server: &TestServer) -> Value {
    let response = server.post("/v1/bookings").json(&booking_form()).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

// ---- Health ----

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn ready_reports_mapbox_and_database() {
    let server = create_test_server();

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ready"], true);
    assert_eq!(body["mapbox_configured"], true);
    assert_eq!(body["database"]["healthy"], true);
}

#[tokio::test]
async fn ready_is_unavailable_without_token() {
    let server = Setup {
        configured: false,
        ..Setup::default()
    }
    .server();

    let response = server.get("/ready").await;

    response.assert_status_service_unavailable();
    let body: Value = response.json();
    assert_eq!(body["mapbox_configured"], false);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let server = create_test_server();

    let response = server.get("/health").await;

    let id = response
        .headers()
        .get("x-request-id")
        .expect("request id header")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

// ---- Routes ----

#[tokio::test]
async fn route_prefers_driving() {
    let server = create_test_server();

    let response = server
        .post("/v1/routes")
        .json(&json!({ "departure": "Gombe", "arrival": "Limete" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["mode"], "driving");
    assert_eq!(body["duration"], 900.0);
    assert_eq!(body["drivingTime"], 900.0);
    assert_eq!(body["geometry"]["type"], "LineString");
    assert_eq!(body["departure"], json!([15.3136, -4.304]));
    assert_eq!(body["summary"]["distance"], "5.0 km");
    assert_eq!(body["summary"]["fare"], 3500);
}

#[tokio::test]
async fn route_falls_back_to_walking() {
    let server = Setup {
        driving_available: false,
        ..Setup::default()
    }
    .server();

    let response = server
        .post("/v1/routes")
        .json(&json!({ "departure": "Gombe", "arrival": "Limete" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["mode"], "walking");
    assert_eq!(body["distance"], 4800.0);
    assert!(body.get("drivingTime").is_none());
}

#[tokio::test]
async fn route_accepts_raw_coordinates() {
    let server = create_test_server();

    let response = server
        .post("/v1/routes")
        .json(&json!({ "departure": "-4.3040,15.3136", "arrival": "-4.3560,15.3460" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["arrival"], json!([15.346, -4.356]));
}

#[tokio::test]
async fn unknown_address_is_unprocessable() {
    let server = create_test_server();

    let response = server
        .post("/v1/routes")
        .json(&json!({ "departure": "Nowhere", "arrival": "Limete" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "route_unavailable");
}

#[tokio::test]
async fn out_of_range_coordinates_are_bad_request() {
    let server = create_test_server();

    let response = server
        .post("/v1/routes")
        .json(&json!({ "departure": "95.0,15.3", "arrival": "Limete" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn missing_credentials_is_internal_error() {
    let server = Setup {
        configured: false,
        ..Setup::default()
    }
    .server();

    let response = server
        .post("/v1/routes")
        .json(&json!({ "departure": "Gombe", "arrival": "Limete" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn empty_endpoint_fails_validation() {
    let server = create_test_server();

    let response = server
        .post("/v1/routes")
        .json(&json!({ "departure": "", "arrival": "Limete" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "validation_error");
}

// ---- Bookings ----

#[tokio::test]
async fn booking_is_priced_and_confirmed() {
    let server = create_test_server();

    let body = create_booking(&server).await;

    assert_eq!(body["booking"]["status"], "confirmed");
    assert_eq!(body["booking"]["price"], 3500);
    assert_eq!(body["booking"]["phone"], "+243812345678");
    assert_eq!(body["booking"]["departure_coords"], "-4.304,15.3136");
    assert_eq!(body["driver"]["trip_minutes"], 15);
    assert_eq!(body["route"]["summary"]["fare"], 3500);
}

#[tokio::test]
async fn booking_with_unknown_address_is_not_stored() {
    let server = create_test_server();

    let response = server
        .post("/v1/bookings")
        .json(&json!({
            "name": "Mbuyi Kalala",
            "phone": "0812345678",
            "departure": "Nowhere",
            "arrival": "Limete"
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let list: Value = server.get("/v1/bookings").await.json();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn booking_with_short_name_is_rejected() {
    let server = create_test_server();

    let response = server
        .post("/v1/bookings")
        .json(&json!({
            "name": "M",
            "phone": "0812345678",
            "departure": "Gombe",
            "arrival": "Limete"
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn bookings_are_listed_newest_first() {
    let server = create_test_server();
    let first = create_booking(&server).await;
    let second = create_booking(&server).await;

    let response = server.get("/v1/bookings").await;

    response.assert_status_ok();
    let list: Value = response.json();
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            second["booking"]["id"].as_str().unwrap(),
            first["booking"]["id"].as_str().unwrap()
        ]
    );
}

#[tokio::test]
async fn booking_can_be_fetched_and_cancelled_once() {
    let server = create_test_server();
    let created = create_booking(&server).await;
    let id = created["booking"]["id"].as_str().unwrap();

    let fetched = server.get(&format!("/v1/bookings/{id}")).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["id"], id);

    let cancelled = server.post(&format!("/v1/bookings/{id}/cancel")).await;
    cancelled.assert_status_ok();
    assert_eq!(cancelled.json::<Value>()["status"], "cancelled");

    let again = server.post(&format!("/v1/bookings/{id}/cancel")).await;
    again.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn deleted_booking_is_gone() {
    let server = create_test_server();
    let created = create_booking(&server).await;
    let id = created["booking"]["id"].as_str().unwrap();

    server
        .delete(&format!("/v1/bookings/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/v1/bookings/{id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn malformed_booking_id_is_bad_request() {
    let server = create_test_server();

    server.get("/v1/bookings/42").await.assert_status_bad_request();
}

// ---- Authentication ----

#[tokio::test]
async fn protected_routes_require_a_key() {
    let server = Setup::default().with_api_key().server();

    server.get("/v1/bookings").await.assert_status_unauthorized();
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn wrong_key_is_rejected() {
    let server = Setup::default().with_api_key().server();

    server
        .get("/v1/bookings")
        .authorization_bearer("mw-unknown-key")
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn bookings_are_scoped_to_their_owner() {
    let server = Setup::default().with_api_key().server();
    let response = server
        .post("/v1/bookings")
        .authorization_bearer(API_KEY)
        .json(&booking_form())
        .await;
    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["booking"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let listed: Value = server
        .get("/v1/bookings")
        .authorization_bearer(API_KEY)
        .await
        .json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["user_id"], OWNER);

    let foreign: Value = server
        .get("/v1/bookings")
        .authorization_bearer(OTHER_KEY)
        .await
        .json();
    assert_eq!(foreign, json!([]));

    server
        .get(&format!("/v1/bookings/{id}"))
        .authorization_bearer(OTHER_KEY)
        .await
        .assert_status_not_found();
    server
        .post(&format!("/v1/bookings/{id}/cancel"))
        .authorization_bearer(OTHER_KEY)
        .await
        .assert_status_not_found();
}
