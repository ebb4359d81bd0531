//! Mapbox integration for Mwinda
//!
//! Provides address geocoding via the
//! [Mapbox Geocoding API](https://docs.mapbox.com/api/search/geocoding-v5/) and
//! routing via the [Mapbox Directions API](https://docs.mapbox.com/api/navigation/directions/).
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern. [`GeocodingClient`] and
//! [`DirectionsClient`] define the interfaces; [`MapboxClient`] implements
//! both over a single HTTP connection pool. No caching or retrying happens
//! here: each call is exactly one request.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::{Coordinate, TravelMode};
//! use integration_mapbox::{DirectionsClient, MapboxClient, MapboxConfig};
//!
//! let client = MapboxClient::new(&MapboxConfig::for_testing())?;
//! let route = client
//!     .route(
//!         Coordinate::new(15.3136, -4.3040)?, // Gombe
//!         Coordinate::new(15.4446, -4.3856)?, // N'djili
//!         TravelMode::Driving,
//!     )
//!     .await?;
//! ```

mod client;
mod config;
mod directions;
mod error;
mod geocoding;
mod models;

pub use client::MapboxClient;
pub use config::MapboxConfig;
pub use directions::DirectionsClient;
pub use error::MapboxError;
pub use geocoding::GeocodingClient;
pub use models::{GeocodeQuery, Place};
