//! Health aggregation service
//!
//! Reports whether the mapping vendor is configured and whether the
//! booking database answers, with a timeout on every check.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::RouteService;
use crate::ports::DatabaseHealthPort;

/// Default timeout for a single health check in seconds
const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Status of an individual service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Whether the service is healthy
    pub healthy: bool,
    /// Optional additional information (e.g. engine version)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Response time in milliseconds (if a check was performed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    /// Create a healthy status
    #[must_use]
    pub const fn healthy() -> Self {
        Self {
            healthy: true,
            info: None,
            response_time_ms: None,
            error: None,
        }
    }

    /// Create a healthy status with additional info
    #[must_use]
    pub fn healthy_with_info(info: impl Into<String>) -> Self {
        Self {
            info: Some(info.into()),
            ..Self::healthy()
        }
    }

    /// Create an unhealthy status
    #[must_use]
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            info: None,
            response_time_ms: None,
            error: Some(error.into()),
        }
    }

    /// Create an unhealthy status due to timeout
    #[must_use]
    pub fn timeout() -> Self {
        Self::unhealthy("Health check timed out")
    }

    /// Add response time to the status
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Health report for all services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// True if every checked service is healthy
    pub healthy: bool,
    /// Individual service statuses
    pub services: HashMap<String, ServiceHealth>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    /// Create a new health report
    #[must_use]
    pub fn new(services: HashMap<String, ServiceHealth>) -> Self {
        let healthy = services.values().all(|s| s.healthy);
        Self {
            healthy,
            services,
            checked_at: chrono::Utc::now(),
        }
    }

    /// Get status of a specific service
    #[must_use]
    pub fn service_status(&self, name: &str) -> Option<&ServiceHealth> {
        self.services.get(name)
    }
}

/// Service aggregating readiness checks
pub struct HealthService {
    routes: Arc<RouteService>,
    database: Option<Arc<dyn DatabaseHealthPort>>,
    check_timeout: Duration,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("database", &self.database.is_some())
            .field("check_timeout", &self.check_timeout)
            .finish_non_exhaustive()
    }
}

impl HealthService {
    /// Create a health service checking the route service's vendor credentials
    #[must_use]
    pub fn new(routes: Arc<RouteService>) -> Self {
        Self {
            routes,
            database: None,
            check_timeout: Duration::from_secs(DEFAULT_HEALTH_CHECK_TIMEOUT_SECS),
        }
    }

    /// Add the booking database for health checking
    #[must_use]
    pub fn with_database(mut self, database: Arc<dyn DatabaseHealthPort>) -> Self {
        self.database = Some(database);
        self
    }

    /// Set the timeout of a single check
    #[must_use]
    pub const fn with_timeout(mut self, check_timeout: Duration) -> Self {
        self.check_timeout = check_timeout;
        self
    }

    /// Check all configured services
    #[instrument(skip(self))]
    pub async fn check_all(&self) -> HealthReport {
        let mut services = HashMap::new();
        services.insert("mapbox".to_string(), self.check_mapbox());
        if self.database.is_some() {
            services.insert("database".to_string(), self.check_database().await);
        }
        HealthReport::new(services)
    }

    /// Whether the mapping vendor credentials are configured
    #[must_use]
    pub fn check_mapbox(&self) -> ServiceHealth {
        if self.routes.has_credentials() {
            ServiceHealth::healthy_with_info("access token configured")
        } else {
            warn!("Mapbox access token missing");
            ServiceHealth::unhealthy("Mapbox access token is not configured")
        }
    }

    /// Check the booking database
    #[instrument(skip(self))]
    pub async fn check_database(&self) -> ServiceHealth {
        let Some(ref database) = self.database else {
            return ServiceHealth::unhealthy("Database not configured");
        };

        let start = Instant::now();
        match timeout(self.check_timeout, database.check_health()).await {
            Ok(Ok(health)) => {
                #[allow(clippy::cast_possible_truncation)]
                let response_time = start.elapsed().as_millis() as u64;
                if health.reachable {
                    debug!(response_time_ms = response_time, "Database healthy");
                    let status = health
                        .version
                        .map_or_else(ServiceHealth::healthy, ServiceHealth::healthy_with_info);
                    status.with_response_time(response_time)
                } else {
                    warn!(response_time_ms = response_time, "Database unreachable");
                    ServiceHealth::unhealthy("Database unreachable").with_response_time(response_time)
                }
            },
            Ok(Err(e)) => {
                warn!(error = %e, "Database health check failed");
                ServiceHealth::unhealthy(e.to_string())
            },
            Err(_) => {
                warn!("Database health check timed out");
                ServiceHealth::timeout()
            },
        }
    }
}
