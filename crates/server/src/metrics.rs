//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the readlog server:
//! - HTTP request metrics (latency, counts)
//! - Cache size and quota usage (collected dynamically)
//! - Core search metrics, registered from `readlog_core::metrics`

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "readlog_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("readlog_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "readlog_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Storage Metrics (collected dynamically)
// =============================================================================

/// Book cache entries.
pub static CACHE_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("readlog_cache_entries", "Number of entries in the book cache").unwrap()
});

/// Google Books requests counted against today's quota.
pub static QUOTA_USED_TODAY: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "readlog_quota_used_today",
        "Google Books requests recorded today",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Storage
    registry.register(Box::new(CACHE_ENTRIES.clone())).unwrap();
    registry
        .register(Box::new(QUOTA_USED_TODAY.clone()))
        .unwrap();

    // Core metrics (search outcomes, cache lookups, providers)
    for metric in readlog_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the stores' current contents.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(count) = state.cache().count() {
        CACHE_ENTRIES.set(count as i64);
    }
    if let Ok(used) = state.quota().used_today() {
        QUOTA_USED_TODAY.set(used);
    }
}

static ISBN_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/isbn/[^/]+").unwrap());

/// Normalize a path for metric labels (replace ISBNs with a placeholder).
pub fn normalize_path(path: &str) -> String {
    ISBN_SEGMENT.replace_all(path, "/isbn/{isbn}").to_string()
}
