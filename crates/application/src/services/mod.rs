//! Application services - Use case implementations

mod booking_service;
mod health_service;
mod route_service;

pub use booking_service::{BookingConfirmation, BookingService, DEFAULT_LIST_LIMIT};
pub use health_service::{HealthReport, HealthService, ServiceHealth};
pub use route_service::{MetroArea, RouteService};
