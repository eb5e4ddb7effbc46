//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the workspace gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Root domains per environment.
    pub domains: DomainConfig,

    /// Backend API used for workspace and membership lookups.
    pub api: ApiConfig,

    /// Auth token cookie and cross-domain clear settings.
    pub session: SessionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Environment root domains.
///
/// Precedence when deciding where "main site" is: hosted preview first,
/// then local development, then production.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Local development root including port.
    pub dev_root: String,

    /// Suffix identifying hosted preview deployments.
    pub preview_suffix: String,

    /// Production custom domain.
    pub production_root: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            dev_root: "localhost:8080".to_string(),
            preview_suffix: "lovable.app".to_string(),
            production_root: "uproom.com".to_string(),
        }
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. "http://localhost:3001/api".
    pub base_url: String,

    /// Per-request timeout for lookups in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Session token propagation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie and storage key name.
    pub cookie_name: String,

    /// Cookie lifetime in days.
    pub max_age_days: i64,

    /// Path of the session-clear page on the root domain.
    pub clear_path: String,

    /// Upper bound on the cross-domain clear request in milliseconds.
    pub clear_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "auth_token".to_string(),
            max_age_days: 7,
            clear_path: "/auth/clear".to_string(),
            clear_timeout_ms: 1000,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Sustained requests per second per client.
    pub requests_per_second: u32,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: 100,
            burst_size: 50,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the pretty format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
