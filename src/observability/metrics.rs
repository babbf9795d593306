//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define responder metrics (requests, latency, filter outcomes)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `ocsp_responder_requests_total` (counter): requests by method, result
//! - `ocsp_responder_request_duration_seconds` (histogram): latency distribution
//! - `ocsp_filter_responses` (counter): filter outcomes by result
//!
//! # Design Decisions
//! - Filter outcomes go through the `FilterMetrics` trait so tests can count them
//! - Recording is a no-op until `init_metrics` installs a recorder

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, result: &'static str, start: Instant) {
    let duration = start.elapsed().as_secs_f64();

    counter!(
        "ocsp_responder_requests_total",
        "method" => method.to_string(),
        "result" => result
    )
    .increment(1);

    histogram!(
        "ocsp_responder_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(duration);
}

/// Outcome of one request through the filtering source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterResult {
    /// The request failed a precheck and never reached the wrapped source.
    RequestFiltered,
    /// The wrapped source returned an error.
    WrappedError,
    /// The wrapped source answered for a different issuer.
    ResponseFiltered,
    Success,
}

impl FilterResult {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::RequestFiltered => "request_filtered",
            Self::WrappedError => "wrapped_error",
            Self::ResponseFiltered => "response_filtered",
            Self::Success => "success",
        }
    }
}

/// Sink for filter outcomes.
pub trait FilterMetrics: Send + Sync {
    fn record(&self, result: FilterResult);
}

/// Reports filter outcomes to the global `metrics` recorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusFilterMetrics;

impl FilterMetrics for PrometheusFilterMetrics {
    fn record(&self, result: FilterResult) {
        counter!("ocsp_filter_responses", "result" => result.as_label()).increment(1);
    }
}
