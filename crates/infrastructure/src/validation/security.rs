//! Security validation for application configuration
//!
//! Validates configuration for security issues and provides warnings at startup.
//! Critical issues in production will prevent startup unless explicitly allowed.

use std::fmt;

use uuid::Uuid;

use crate::config::AppConfig;

/// Escape hatch that lets a production server start despite critical issues
pub const ALLOW_INSECURE_ENV: &str = "MWINDA_ALLOW_INSECURE_CONFIG";

/// Severity level for security warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningSeverity {
    /// Informational - no action required
    Info,
    /// Warning - should be addressed but not critical
    Warning,
    /// Critical - must be addressed in production
    Critical,
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A security warning with severity and description
#[derive(Debug, Clone)]
pub struct SecurityWarning {
    /// Severity level of the warning
    pub severity: WarningSeverity,
    /// Short code identifying the warning type
    pub code: &'static str,
    /// Human-readable description of the issue
    pub message: String,
    /// Recommended action to resolve the issue
    pub recommendation: String,
}

impl SecurityWarning {
    /// Create a new security warning
    #[must_use]
    pub fn new(
        severity: WarningSeverity,
        code: &'static str,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Check if this warning is critical
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self.severity, WarningSeverity::Critical)
    }
}

impl fmt::Display for SecurityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} - {}",
            self.severity, self.code, self.message, self.recommendation
        )
    }
}

/// Validates application configuration for security issues
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityValidator;

impl SecurityValidator {
    /// Validate configuration and return all security warnings
    ///
    /// Returns a list of warnings sorted by severity (critical first).
    #[must_use]
    pub fn validate(config: &AppConfig) -> Vec<SecurityWarning> {
        let mut warnings = Vec::new();
        let is_production = config.is_production();

        Self::check_cors_configuration(config, is_production, &mut warnings);
        Self::check_api_keys(config, is_production, &mut warnings);
        Self::check_identities(config, &mut warnings);
        Self::check_mapbox_token(config, is_production, &mut warnings);
        Self::check_database_configuration(config, is_production, &mut warnings);

        warnings.sort_by(|a, b| b.severity.cmp(&a.severity));
        warnings
    }

    /// Check if startup should be blocked due to critical security issues
    ///
    /// Returns `true` if the server should refuse to start.
    #[must_use]
    pub fn should_block_startup(config: &AppConfig, warnings: &[SecurityWarning]) -> bool {
        let allow_insecure = std::env::var(ALLOW_INSECURE_ENV)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self::blocks(config, warnings, allow_insecure)
    }

    fn blocks(config: &AppConfig, warnings: &[SecurityWarning], allow_insecure: bool) -> bool {
        config.is_production()
            && warnings.iter().any(SecurityWarning::is_critical)
            && !allow_insecure
    }

    /// Log all warnings using tracing
    pub fn log_warnings(warnings: &[SecurityWarning]) {
        for warning in warnings {
            match warning.severity {
                WarningSeverity::Critical => {
                    tracing::error!(
                        code = warning.code,
                        message = %warning.message,
                        recommendation = %warning.recommendation,
                        "Security configuration issue"
                    );
                },
                WarningSeverity::Warning => {
                    tracing::warn!(
                        code = warning.code,
                        message = %warning.message,
                        recommendation = %warning.recommendation,
                        "Security configuration warning"
                    );
                },
                WarningSeverity::Info => {
                    tracing::info!(
                        code = warning.code,
                        message = %warning.message,
                        recommendation = %warning.recommendation,
                        "Security configuration notice"
                    );
                },
            }
        }
    }

    const fn severity(
        is_production: bool,
        in_production: WarningSeverity,
        otherwise: WarningSeverity,
    ) -> WarningSeverity {
        if is_production { in_production } else { otherwise }
    }

    fn check_cors_configuration(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<SecurityWarning>,
    ) {
        if config.server.cors_enabled && config.server.allowed_origins.is_empty() {
            warnings.push(SecurityWarning::new(
                Self::severity(is_production, WarningSeverity::Critical, WarningSeverity::Info),
                "SEC001",
                "CORS is enabled with no origin restrictions (allows all origins)",
                "Specify server.allowed_origins in production",
            ));
        }
    }

    fn check_api_keys(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<SecurityWarning>,
    ) {
        if !config.security.has_api_keys() {
            warnings.push(SecurityWarning::new(
                Self::severity(is_production, WarningSeverity::Critical, WarningSeverity::Info),
                "SEC002",
                "No API keys configured, every request uses the anonymous identity",
                "Add [[security.api_keys]] entries generated with `mwinda-cli hash-api-key`",
            ));
        }

        let plaintext = config.security.count_plaintext_keys();
        if plaintext > 0 {
            warnings.push(SecurityWarning::new(
                WarningSeverity::Critical,
                "SEC003",
                format!("{plaintext} API key(s) are not Argon2 hashes and can never match"),
                "Replace them with the output of `mwinda-cli hash-api-key <key>`",
            ));
        }
    }

    fn check_identities(config: &AppConfig, warnings: &mut Vec<SecurityWarning>) {
        let invalid = config
            .security
            .api_keys
            .iter()
            .filter(|entry| Uuid::parse_str(&entry.user_id).is_err())
            .count();
        if invalid > 0 {
            warnings.push(SecurityWarning::new(
                WarningSeverity::Critical,
                "SEC004",
                format!("{invalid} API key(s) map to a user_id that is not a UUID"),
                "Use UUIDs for security.api_keys[].user_id",
            ));
        }

        if Uuid::parse_str(&config.security.anonymous_user_id).is_err() {
            warnings.push(SecurityWarning::new(
                WarningSeverity::Critical,
                "SEC005",
                "security.anonymous_user_id is not a UUID",
                "Use a UUID or remove the setting to use the default",
            ));
        }
    }

    fn check_mapbox_token(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<SecurityWarning>,
    ) {
        if !config.mapbox.has_access_token() {
            warnings.push(SecurityWarning::new(
                Self::severity(is_production, WarningSeverity::Critical, WarningSeverity::Warning),
                "SEC006",
                "No Mapbox access token configured, route requests will fail",
                "Set MWINDA_MAPBOX__ACCESS_TOKEN or MAPBOX_ACCESS_TOKEN",
            ));
        }
    }

    fn check_database_configuration(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<SecurityWarning>,
    ) {
        if config.database.is_in_memory() && is_production {
            warnings.push(SecurityWarning::new(
                WarningSeverity::Warning,
                "SEC007",
                "Bookings are stored in an in-memory database",
                "Point database.path at a file in production",
            ));
        }
    }
}
