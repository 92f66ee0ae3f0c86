//! Prometheus metrics for the refresh pipeline.
//!
//! This module provides metrics for:
//! - Refresh cycle duration
//! - Quote snapshot fetch latency
//! - Refresh outcomes and dropped triggers
//! - Scan results (opportunities, degenerate quotes)

use std::time::Instant;

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use tracing::debug;

// === Metric Name Constants ===

/// Refresh cycle duration metric name.
pub const METRIC_REFRESH_DURATION: &str = "refresh_duration_ms";
/// Quote snapshot fetch latency metric name.
pub const METRIC_QUOTE_FETCH_LATENCY: &str = "quote_fetch_latency_ms";
/// Completed refreshes counter metric name.
pub const METRIC_REFRESHES: &str = "refreshes_total";
/// Failed refreshes counter metric name.
pub const METRIC_REFRESH_FAILURES: &str = "refresh_failures_total";
/// Dropped refresh triggers counter metric name.
pub const METRIC_TRIGGERS_DROPPED: &str = "triggers_dropped_total";
/// Degenerate quotes counter metric name.
pub const METRIC_DEGENERATE_QUOTES: &str = "degenerate_quotes_total";
/// Opportunities detected counter metric name.
pub const METRIC_OPPORTUNITIES_DETECTED: &str = "opportunities_detected_total";
/// Open opportunities gauge metric name.
pub const METRIC_OPEN_OPPORTUNITIES: &str = "open_opportunities";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    // Latency histograms
    describe_histogram!(
        METRIC_REFRESH_DURATION,
        "Full refresh cycle duration in milliseconds"
    );
    describe_histogram!(
        METRIC_QUOTE_FETCH_LATENCY,
        "Quote snapshot fetch latency in milliseconds"
    );

    // Counters
    describe_counter!(
        METRIC_REFRESHES,
        "Total number of refreshes that published a result set"
    );
    describe_counter!(
        METRIC_REFRESH_FAILURES,
        "Total number of refreshes that failed to fetch quotes"
    );
    describe_counter!(
        METRIC_TRIGGERS_DROPPED,
        "Total number of refresh triggers dropped while a fetch was in flight"
    );
    describe_counter!(
        METRIC_DEGENERATE_QUOTES,
        "Total number of snapshot rows rejected for degenerate quotes"
    );
    describe_counter!(
        METRIC_OPPORTUNITIES_DETECTED,
        "Total number of arbitrage opportunities detected"
    );

    // Gauges
    describe_gauge!(
        METRIC_OPEN_OPPORTUNITIES,
        "Number of opportunities in the current result set"
    );

    debug!("Metrics initialized");
}

/// Record quote snapshot fetch latency.
pub fn record_quote_fetch_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_QUOTE_FETCH_LATENCY).record(latency_ms);
}

/// Increment completed refreshes counter.
pub fn inc_refreshes() {
    counter!(METRIC_REFRESHES).increment(1);
}

/// Increment failed refreshes counter.
pub fn inc_refresh_failures() {
    counter!(METRIC_REFRESH_FAILURES).increment(1);
}

/// Increment dropped triggers counter.
pub fn inc_triggers_dropped() {
    counter!(METRIC_TRIGGERS_DROPPED).increment(1);
}

/// Increment degenerate quotes counter.
pub fn inc_degenerate_quotes() {
    counter!(METRIC_DEGENERATE_QUOTES).increment(1);
}

/// Increment opportunities detected counter.
pub fn inc_opportunities_detected() {
    counter!(METRIC_OPPORTUNITIES_DETECTED).increment(1);
}

/// Set the open opportunities gauge.
pub fn set_open_opportunities(count: usize) {
    gauge!(METRIC_OPEN_OPPORTUNITIES).set(count as f64);
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

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for a full refresh cycle.
pub fn timer_refresh() -> LatencyTimer {
    LatencyTimer::new(METRIC_REFRESH_DURATION)
}
