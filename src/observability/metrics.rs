//! Metrics collection and exposition.
//!
//! # Metrics
//! - `audit_records_emitted_total` (counter): records handed to the sink, by variant
//! - `audit_capture_failures_total` (counter): hook failures, by stage
//! - `audit_exchange_duration_seconds` (histogram): time between the two observation points

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_emitted(variant: &'static str) {
    counter!("audit_records_emitted_total", "variant" => variant).increment(1);
}

pub fn record_capture_failure(stage: &'static str) {
    counter!("audit_capture_failures_total", "stage" => stage).increment(1);
}

pub fn record_exchange_duration(variant: &'static str, start: Instant) {
    histogram!("audit_exchange_duration_seconds", "variant" => variant)
        .record(start.elapsed().as_secs_f64());
}
