//! Metrics collection and exposition.
//!
//! # Metrics
//! - `scope_proxy_requests_total` (counter): requests by dispatch kind, status
//! - `scope_proxy_request_duration_seconds` (histogram): latency by dispatch kind
//! - `scope_proxy_intercept_decisions_total` (counter): decisions by outcome
//! - `scope_proxy_playground_updates_total` (counter): control updates applied

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::{Error, Result};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| Error::Metrics(e.to_string()))?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished request.
pub fn record_request(kind: &'static str, status: u16, start: Instant) {
    counter!(
        "scope_proxy_requests_total",
        "kind" => kind,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("scope_proxy_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

/// Count one interception decision by outcome label.
pub fn record_decision(outcome: &'static str) {
    counter!("scope_proxy_intercept_decisions_total", "outcome" => outcome).increment(1);
}

/// Count one applied playground update.
pub fn record_playground_update() {
    counter!("scope_proxy_playground_updates_total").increment(1);
}
