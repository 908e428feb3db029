//! Metrics collection and exposition.
//!
//! # Metrics
//! - `honeytoken_requests_total` (counter): requests by method
//! - `honeytoken_request_duration_seconds` (histogram): time to response
//! - `honeytoken_triggers_total` (counter): requests that matched a token
//! - `honeytoken_lookup_errors_total` (counter): registry failures (not misses)
//! - `honeytoken_alerts_total` (counter): deliveries by outcome
//! - `honeytoken_response_file_errors_total` (counter): failed decoy reads
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, start: Instant) {
    ::metrics::counter!("honeytoken_requests_total", "method" => method.to_string()).increment(1);
    ::metrics::histogram!("honeytoken_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_trigger() {
    ::metrics::counter!("honeytoken_triggers_total").increment(1);
}

pub fn record_lookup_error() {
    ::metrics::counter!("honeytoken_lookup_errors_total").increment(1);
}

pub fn record_alert(delivered: bool) {
    let outcome = if delivered { "delivered" } else { "failed" };
    ::metrics::counter!("honeytoken_alerts_total", "outcome" => outcome).increment(1);
}

pub fn record_response_file_error() {
    ::metrics::counter!("honeytoken_response_file_errors_total").increment(1);
}
