//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_detections_total` (counter): controller runs by terminal outcome
//! - `gateway_resolver_requests_total` (counter): lookups by status
//! - `gateway_resolve_duration_seconds` (histogram): lookup latency
//! - `gateway_guard_decisions_total` (counter): guard decisions by guard and kind
//! - `gateway_rate_limited_total` (counter): rejected requests

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_detection(outcome: &'static str) {
    counter!("gateway_detections_total", "outcome" => outcome).increment(1);
}

pub fn record_resolver_request(status: &str, start: Instant) {
    counter!("gateway_resolver_requests_total", "status" => status.to_string()).increment(1);
    histogram!("gateway_resolve_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_guard_decision(guard: &'static str, decision: &'static str) {
    counter!("gateway_guard_decisions_total", "guard" => guard, "decision" => decision)
        .increment(1);
}

pub fn record_rate_limited() {
    counter!("gateway_rate_limited_total").increment(1);
}
