//! Database health check port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Database health information
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseHealth {
    /// Whether the database answered a trivial query
    pub reachable: bool,
    /// Engine version, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Round-trip time of the check in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl DatabaseHealth {
    /// Create a healthy status with version info
    #[must_use]
    pub fn healthy_with_version(version: impl Into<String>) -> Self {
        Self {
            reachable: true,
            version: Some(version.into()),
            response_time_ms: None,
        }
    }

    /// Create an unhealthy status
    #[must_use]
    pub const fn unhealthy() -> Self {
        Self {
            reachable: false,
            version: None,
            response_time_ms: None,
        }
    }

    /// Add response time to the health status
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Port for database health checks
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseHealthPort: Send + Sync {
    /// Run a lightweight query (e.g. `SELECT 1`) and report the result
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError>;
}
