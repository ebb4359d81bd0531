//! Mwinda HTTP presentation layer
//!
//! axum API for route resolution and ride bookings.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use middleware::{ApiKeyAuthLayer, ValidatedJson, ValidationError};
pub use routes::{build_app, create_router};
pub use state::AppState;
