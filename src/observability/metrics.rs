//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_calls_total` (counter): backend calls by operation, outcome
//! - `gateway_call_duration_seconds` (histogram): backend call latency by operation
//! - `gateway_transport_failures_total` (counter): socket failures by tag (ER040/ER060/ER099)
//! - `gateway_backend_connections` (gauge): currently open System I sockets
//! - `gateway_http_requests_total` (counter): HTTP responses by path, status
//!
//! # Design Decisions
//! - The `metrics` facade is used everywhere; the Prometheus exporter is
//!   only installed when enabled, otherwise updates are no-ops
//! - Labels are bounded sets (operation names, tags, status codes)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// One finished backend call.
pub fn record_call(operation: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!("gateway_calls_total", "operation" => operation, "outcome" => outcome).increment(1);
    metrics::histogram!("gateway_call_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_transport_failure(tag: &'static str) {
    metrics::counter!("gateway_transport_failures_total", "tag" => tag).increment(1);
}

pub fn backend_connection_opened() {
    metrics::gauge!("gateway_backend_connections").increment(1.0);
}

pub fn backend_connection_closed() {
    metrics::gauge!("gateway_backend_connections").decrement(1.0);
}

pub fn record_http_request(path: &str, status: u16) {
    metrics::counter!(
        "gateway_http_requests_total",
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
