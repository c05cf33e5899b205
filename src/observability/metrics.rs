//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gate metrics (requests, latency, resolutions, reloads)
//! - Expose Prometheus-compatible metrics endpoint
//! - Track per-tenant and aggregate metrics
//!
//! # Metrics
//! - `gate_requests_total` (counter): requests by method, status, tenant
//! - `gate_request_duration_seconds` (histogram): latency distribution
//! - `gate_tenant_resolutions_total` (counter): resolution outcomes
//! - `gate_config_reloads_total` (counter): reload attempts by outcome
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Tenant label stays low-cardinality: one value per configured tenant
//!   plus "none"

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exposition endpoint and describe the metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(
                "gate_requests_total",
                "Requests handled, by method, status and tenant."
            );
            describe_histogram!(
                "gate_request_duration_seconds",
                "Request latency in seconds, by method, status and tenant."
            );
            describe_counter!(
                "gate_tenant_resolutions_total",
                "Tenant resolution outcomes."
            );
            describe_counter!(
                "gate_config_reloads_total",
                "Configuration reload attempts, by outcome."
            );
            tracing::info!(address = %addr, "Metrics endpoint started");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, tenant: &str, start_time: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("tenant", tenant.to_string()),
    ];
    counter!("gate_requests_total", &labels).increment(1);
    histogram!("gate_request_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record one resolver outcome ("bound" or "unbound").
pub fn record_resolution(outcome: &str) {
    counter!("gate_tenant_resolutions_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record one configuration reload attempt.
pub fn record_reload(accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    counter!("gate_config_reloads_total", "outcome" => outcome).increment(1);
}
