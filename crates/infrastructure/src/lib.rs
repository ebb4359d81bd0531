//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports: Mapbox geocoding and directions, the
//! SQLite booking store and simulated driver dispatch. Also owns
//! configuration loading, logging setup and startup validation.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;
pub mod validation;

pub use adapters::*;
pub use config::{
    AppConfig, DatabaseConfig, DispatchConfig, Environment, LogFormat, MapboxAppConfig,
    SecurityConfig, ServerConfig,
};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteBookingStore, SqliteDatabaseHealth, create_pool,
};
pub use telemetry::{DEFAULT_LOG_FILTER, TelemetryError, init_tracing};
pub use validation::{SecurityValidator, SecurityWarning, WarningSeverity};
