//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Structured fields (`subdomain`, `host`, `request_id`) rather than prose
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
