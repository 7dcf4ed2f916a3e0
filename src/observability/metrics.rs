//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by outcome
//!   (`proxied`, `unmatched`, `bad_gateway`, `management`)
//! - `gateway_upstream_duration_seconds` (histogram): backend exchange latency
//! - `gateway_route_mutations_total` (counter): admin changes by op and result
//! - `gateway_routes` (gauge): routes currently in the table
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an
//!   exporter is installed
//! - The Prometheus exporter is opt-in (`observability.metrics_enabled`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_request(outcome: &'static str) {
    metrics::counter!("gateway_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_upstream(route: &str, status: u16, start: Instant) {
    metrics::histogram!(
        "gateway_upstream_duration_seconds",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_mutation(op: &'static str, result: &'static str) {
    metrics::counter!("gateway_route_mutations_total", "op" => op, "result" => result).increment(1);
}

pub fn record_route_count(count: usize) {
    metrics::gauge!("gateway_routes").set(count as f64);
}
