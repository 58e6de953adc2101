//! Metrics collection and exposition.
//!
//! # Metrics
//! - `twirp_requests_total` (counter): calls by route and result code
//! - `twirp_request_duration_seconds` (histogram): dispatch latency by route
//!
//! # Design Decisions
//! - Unmatched paths share one `route` label to bound cardinality
//! - Recording is a no-op until an exporter is installed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Label used for requests that never resolved a route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched call.
pub fn record_call(route: &str, code: &'static str, start: Instant) {
    metrics::counter!(
        "twirp_requests_total",
        "route" => route.to_string(),
        "code" => code
    )
    .increment(1);
    metrics::histogram!("twirp_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}
