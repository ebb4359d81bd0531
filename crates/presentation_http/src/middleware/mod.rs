//! HTTP middleware components
//!
//! Authentication, request IDs and body validation.

pub mod auth;
pub mod request_id;
pub mod validation;

pub use auth::{ApiKeyAuth, ApiKeyAuthLayer, ApiKeyStore};
pub use request_id::{MakeRequestUuidV7, REQUEST_ID_HEADER, http_span, request_id_of};
pub use validation::{ValidatedJson, ValidationError};
