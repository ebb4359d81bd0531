//! Simulated driver dispatch
//!
//! Stands in for a real dispatch backend: waits a configurable delay, then
//! picks a driver from a fixed roster uniformly at random.

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::DriverDispatchPort;
use async_trait::async_trait;
use domain::{Coordinate, Driver};
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

use crate::config::DispatchConfig;

/// Dispatch adapter answering from a fixed driver roster
#[derive(Debug, Clone)]
pub struct SimulatedDispatchAdapter {
    roster: Vec<Driver>,
    search_delay: Duration,
}

impl SimulatedDispatchAdapter {
    /// Create an adapter over the demo roster
    #[must_use]
    pub fn new(config: &DispatchConfig) -> Self {
        Self::with_roster(Driver::demo_roster(), config)
    }

    /// Create an adapter over a custom roster
    #[must_use]
    pub fn with_roster(roster: Vec<Driver>, config: &DispatchConfig) -> Self {
        Self {
            roster,
            search_delay: Duration::from_millis(config.search_delay_ms),
        }
    }
}

#[async_trait]
impl DriverDispatchPort for SimulatedDispatchAdapter {
    #[instrument(skip(self), fields(%pickup, roster = self.roster.len()))]
    async fn find_driver(&self, pickup: Coordinate) -> Result<Option<Driver>, ApplicationError> {
        if !self.search_delay.is_zero() {
            tokio::time::sleep(self.search_delay).await;
        }

        let driver = self.roster.choose(&mut rand::rng()).cloned();
        if let Some(ref driver) = driver {
            debug!(driver = %driver.name, eta_minutes = driver.eta_minutes, "Driver found");
        }
        Ok(driver)
    }
}
