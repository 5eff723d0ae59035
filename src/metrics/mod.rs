//! Prometheus metrics for the hotspace service.
//!
//! - Hot command metrics (created, rendered, render failures by reason)
//! - Space metrics (saved, shared)
//! - Storage backend gauge

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge_vec,
    Histogram, IntCounter, IntCounterVec, IntGaugeVec, TextEncoder,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "hotspace";

lazy_static! {
    /// Hot commands created
    pub static ref COMMANDS_CREATED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_commands_created_total", METRIC_PREFIX),
        "Total number of hot commands created"
    ).unwrap();

    /// Successful renders by query type
    pub static ref COMMANDS_RENDERED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_commands_rendered_total", METRIC_PREFIX),
        "Total number of hot commands rendered",
        &["query_type"]
    ).unwrap();

    /// Failed renders by reason
    pub static ref RENDER_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_render_failures_total", METRIC_PREFIX),
        "Total number of failed hot command renders",
        &["reason"]
    ).unwrap();

    /// Rendered query length in bytes
    pub static ref RENDERED_QUERY_BYTES: Histogram = register_histogram!(
        format!("{}_rendered_query_bytes", METRIC_PREFIX),
        "Size of rendered queries in bytes",
        vec![64.0, 256.0, 1024.0, 4096.0, 16384.0, 65536.0]
    ).unwrap();

    /// Spaces saved (created or overwritten)
    pub static ref SPACES_SAVED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_spaces_saved_total", METRIC_PREFIX),
        "Total number of space saves"
    ).unwrap();

    /// Spaces marked as shared
    pub static ref SPACES_SHARED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_spaces_shared_total", METRIC_PREFIX),
        "Total number of share operations"
    ).unwrap();

    /// Active storage backend (1 for the backend in use)
    pub static ref STORAGE_BACKEND: IntGaugeVec = register_int_gauge_vec!(
        format!("{}_storage_backend", METRIC_PREFIX),
        "Storage backend in use",
        &["backend"]
    ).unwrap();
}

/// Encode all registered metrics in Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode_to_string(&metric_families)
}

/// Helper for recording render outcomes
pub struct RenderMetrics;

impl RenderMetrics {
    pub fn record_success(query_type: &str, query_len: usize) {
        COMMANDS_RENDERED_TOTAL
            .with_label_values(&[query_type])
            .inc();
        RENDERED_QUERY_BYTES.observe(query_len as f64);
    }

    pub fn record_missing_parameter() {
        RENDER_FAILURES_TOTAL
            .with_label_values(&["missing_parameter"])
            .inc();
    }

    pub fn record_inactive() {
        RENDER_FAILURES_TOTAL.with_label_values(&["inactive"]).inc();
    }
}
