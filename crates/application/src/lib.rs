//! Application layer - Use cases and orchestration
//!
//! Contains the route-resolution workflow, the booking use cases and the
//! port definitions the infrastructure layer implements.

pub mod error;
pub mod ports;
pub mod request_context;
pub mod services;

pub use error::{ApplicationError, RouteError};
pub use ports::*;
pub use request_context::RequestContext;
pub use services::*;
