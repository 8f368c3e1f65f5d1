//! Prometheus metrics for the cache gateway and invalidation hooks.

use metrics::{counter, describe_counter};

/// Metric names.
pub mod names {
    /// Cache lookups that found an entry.
    pub const CACHE_HITS_TOTAL: &str = "ledger_cache_hits_total";
    /// Cache lookups that found nothing.
    pub const CACHE_MISSES_TOTAL: &str = "ledger_cache_misses_total";
    /// Cache operations that failed and were swallowed.
    pub const CACHE_ERRORS_TOTAL: &str = "ledger_cache_errors_total";
    /// Invalidation hooks executed.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "ledger_cache_invalidations_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache misses");
    describe_counter!(
        names::CACHE_ERRORS_TOTAL,
        "Total number of cache operations that failed"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Total number of cache invalidation hooks executed"
    );
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a lookup result for an entry family (`record`, `total_count`).
    pub fn lookup(family: &'static str, hit: bool) {
        let name = if hit {
            names::CACHE_HITS_TOTAL
        } else {
            names::CACHE_MISSES_TOTAL
        };
        counter!(name, "family" => family).increment(1);
    }

    /// Record a swallowed failure.
    pub fn error(family: &'static str, operation: &'static str) {
        counter!(
            names::CACHE_ERRORS_TOTAL,
            "family" => family,
            "operation" => operation
        )
        .increment(1);
    }

    /// Record an executed invalidation (`after_commit` or `immediate`).
    pub fn invalidation(mode: &'static str) {
        counter!(names::CACHE_INVALIDATIONS_TOTAL, "mode" => mode).increment(1);
    }
}
