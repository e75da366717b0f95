//! Metrics collection and exposition.
//!
//! # Metrics
//! - `errol_requests_total` (counter): requests by route, method, status
//! - `errol_request_duration_seconds` (histogram): handling latency by route
//! - `errol_devices_registered_total` (counter): successful registrations
//!
//! # Design Decisions
//! - Exporter is opt-in; without it the macros record into a no-op recorder
//! - Unmatched requests are labelled with route "none"

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record a completed request.
pub fn record_request(route: &'static str, method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "errol_requests_total",
        "route" => route,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!("errol_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_device_registered() {
    metrics::counter!("errol_devices_registered_total").increment(1);
}
