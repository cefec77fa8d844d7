//! Metrics collection and exposition.
//!
//! # Metrics
//! - `quire_requests_total` (counter): served requests by method, status
//! - `quire_request_duration_seconds` (histogram): latency distribution
//! - `quire_route_misses_total` (counter): paths no route matched
//! - `quire_nested_builds_total` (counter): nested builder runs by source

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "quire_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("quire_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_route_miss(fallback: bool) {
    ::metrics::counter!(
        "quire_route_misses_total",
        "fallback" => if fallback { "true" } else { "false" }
    )
    .increment(1);
}

/// `source` is `page` for page-registered builders, `registry` for site builders.
pub fn record_nested_build(source: &'static str) {
    ::metrics::counter!("quire_nested_builds_total", "source" => source).increment(1);
}
