//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Search outcomes and cache effectiveness
//! - External catalog requests
//! - Time spent waiting on the global catalog's request spacing

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

// =============================================================================
// Search
// =============================================================================

/// Search outcomes by variant.
pub static SEARCH_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("readlog_search_outcomes_total", "Total ISBN searches by outcome"),
        &["outcome"], // SearchOutcome::label()
    )
    .unwrap()
});

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("readlog_cache_lookups_total", "Total book cache lookups"),
        &["result"], // "hit", "miss", "expired"
    )
    .unwrap()
});

// =============================================================================
// External catalogs
// =============================================================================

/// Provider requests by provider and result.
pub static PROVIDER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "readlog_provider_requests_total",
            "Total external catalog requests",
        ),
        &["provider", "result"], // result: "success", "rate_limited", "error"
    )
    .unwrap()
});

/// Time spent waiting for the minimum request interval.
pub static RATE_LIMIT_WAIT: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "readlog_rate_limit_wait_seconds",
            "Time spent waiting before a rate-limited request",
        )
        .buckets(vec![0.0, 0.1, 0.25, 0.5, 1.0, 1.5, 2.0, 5.0]),
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCH_OUTCOMES.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(PROVIDER_REQUESTS.clone()),
        Box::new(RATE_LIMIT_WAIT.clone()),
    ]
}
