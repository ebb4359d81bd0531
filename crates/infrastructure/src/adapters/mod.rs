//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod api_key_hasher;
mod mapbox_adapter;
mod simulated_dispatch_adapter;

pub use api_key_hasher::{ApiKeyHashError, ApiKeyHasher};
pub use mapbox_adapter::MapboxAdapter;
pub use simulated_dispatch_adapter::SimulatedDispatchAdapter;
