//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber
//! - Honour `RUST_LOG` over the configured level
//! - Switch between pretty and JSON output

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("workspace_gateway={},tower_http=info", config.log_level).into()
    });

    let (json, pretty) = if config.json_logs {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init();
}
