//! Route definitions and middleware stack

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    handlers,
    middleware::{ApiKeyAuthLayer, MakeRequestUuidV7, REQUEST_ID_HEADER, http_span},
    state::AppState,
};

/// Create the router with all routes and no middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Route API (v1)
        .route("/v1/routes", post(handlers::route::resolve_route))
        // Booking API (v1)
        .route(
            "/v1/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/v1/bookings/{id}",
            get(handlers::bookings::get_booking).delete(handlers::bookings::delete_booking),
        )
        .route(
            "/v1/bookings/{id}/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .with_state(state)
}

/// Create the router wrapped in the full middleware stack
///
/// Outermost first: CORS, request ID, access log, body limit, authentication.
pub fn build_app(state: AppState) -> Router {
    let server = state.config.server.clone();
    let auth_layer = ApiKeyAuthLayer::from_config(&state.config.security);

    let app = create_router(state)
        .layer(auth_layer)
        .layer(DefaultBodyLimit::max(server.max_body_size_json_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuidV7))
                .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<Body>| http_span(request)),
                ),
        );

    match cors_layer(&server) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// CORS policy from the server configuration
///
/// No configured origins means any origin is allowed.
pub fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    if !server.cors_enabled {
        return None;
    }

    let methods = [Method::GET, Method::POST, Method::DELETE];
    if server.allowed_origins.is_empty() {
        return Some(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(methods)
                .allow_headers(Any),
        );
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any),
    )
}
