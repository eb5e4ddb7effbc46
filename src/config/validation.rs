//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, cookie lifetime > 0)
//! - Check that URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// Paths the gateway serves itself; the clear page cannot reuse them.
const RESERVED_PATHS: &[&str] = &[
    "/health",
    "/workspace",
    "/workspace/view",
    "/dashboard",
    "/auth/session",
];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.domains.dev_root.is_empty() {
        errors.push(ValidationError::new("domains.dev_root", "must not be empty"));
    }
    if config.domains.production_root.is_empty() {
        errors.push(ValidationError::new("domains.production_root", "must not be empty"));
    }
    if config.domains.production_root.contains("://") {
        errors.push(ValidationError::new(
            "domains.production_root",
            "must be a bare domain without scheme",
        ));
    }

    if url::Url::parse(&config.api.base_url).is_err() {
        errors.push(ValidationError::new(
            "api.base_url",
            format!("'{}' is not a valid URL", config.api.base_url),
        ));
    }
    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::new("api.timeout_secs", "must be greater than 0"));
    }

    if config.session.cookie_name.is_empty() {
        errors.push(ValidationError::new("session.cookie_name", "must not be empty"));
    }
    if config.session.max_age_days <= 0 {
        errors.push(ValidationError::new("session.max_age_days", "must be greater than 0"));
    }
    if !config.session.clear_path.starts_with('/') {
        errors.push(ValidationError::new("session.clear_path", "must start with '/'"));
    } else if RESERVED_PATHS.contains(&config.session.clear_path.as_str()) {
        errors.push(ValidationError::new(
            "session.clear_path",
            format!("'{}' is already served by the gateway", config.session.clear_path),
        ));
    }
    if config.session.clear_timeout_ms == 0 {
        errors.push(ValidationError::new("session.clear_timeout_ms", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.rate_limit.enabled && config.rate_limit.requests_per_second == 0 {
        errors.push(ValidationError::new(
            "rate_limit.requests_per_second",
            "must be greater than 0 when rate limiting is enabled",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
