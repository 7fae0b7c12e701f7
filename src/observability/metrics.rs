//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by mount, method, status
//! - `gateway_request_duration_seconds` (histogram): time to response head
//!
//! Without an installed recorder the macros are no-ops, so handlers record
//! unconditionally.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(mount: &str, method: &str, status: u16, start: Instant) {
    let mount = mount.to_string();
    let method = method.to_string();
    let status = status.to_string();

    metrics::counter!(
        "gateway_requests_total",
        "mount" => mount.clone(),
        "method" => method.clone(),
        "status" => status.clone()
    )
    .increment(1);

    metrics::histogram!(
        "gateway_request_duration_seconds",
        "mount" => mount,
        "method" => method,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}
