//! Prometheus metrics for conversion traffic.
//!
//! This module provides:
//! - Conversion counters, split by outcome
//! - Conversion handling latency
//! - HTTP request latency per endpoint

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::error::{ConversionError, ServiceError};

// === Metric Name Constants ===

/// Successful conversions counter metric name.
pub const METRIC_CONVERSIONS: &str = "conversions_total";
/// Rejected conversions counter metric name.
pub const METRIC_CONVERSION_ERRORS: &str = "conversion_errors_total";
/// Conversion latency metric name.
pub const METRIC_CONVERSION_LATENCY: &str = "conversion_latency_ms";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_CONVERSION_LATENCY,
        "Time spent converting a single request in milliseconds"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    describe_counter!(METRIC_CONVERSIONS, "Total number of successful conversions");
    describe_counter!(
        METRIC_CONVERSION_ERRORS,
        "Total number of rejected conversions, labelled by error kind"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_prometheus() -> Result<PrometheusHandle, ServiceError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServiceError::Metrics(e.to_string()))?;
    init_metrics();
    Ok(handle)
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment successful conversions, labelled by currency pair.
pub fn inc_conversions(from: &'static str, to: &'static str) {
    counter!(METRIC_CONVERSIONS, "from" => from, "to" => to).increment(1);
}

/// Increment rejected conversions.
pub fn inc_conversion_errors(error: &ConversionError) {
    counter!(METRIC_CONVERSION_ERRORS, "kind" => error.kind()).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for a conversion.
pub fn timer_conversion() -> LatencyTimer {
    LatencyTimer::new(METRIC_CONVERSION_LATENCY)
}
