//! # Metrics Traits
//!
//! ```text
//!   ┌──────────────────────────────────┐
//!   │  FrequencyListMetricsRecorder    │  written by the list on every call
//!   └────────────────┬─────────────────┘
//!                    │
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters written by [`FrequencyList`](crate::FrequencyList).
pub trait FrequencyListMetricsRecorder {
    fn record_update_new(&mut self);
    fn record_update_promoted(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    /// A `remove_least_frequent` / `remove_most_frequent` call and its yield.
    fn record_frequency_eviction(&mut self, removed: usize);
    /// A count-bounded overall recency removal and its yield.
    fn record_recency_eviction(&mut self, removed: usize);
    /// A time-window overall recency removal and its yield.
    fn record_window_eviction(&mut self, removed: usize);
    fn record_feature_refusal(&mut self);
    fn record_clear(&mut self);
}

/// Produces a point-in-time copy of the counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Publishes a snapshot to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
