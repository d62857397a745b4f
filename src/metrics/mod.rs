//! Operation counters for [`FrequencyList`](crate::FrequencyList).
//!
//! Enabled with the `metrics` feature. Recording, snapshotting and export are
//! kept apart: the list writes through [`traits::FrequencyListMetricsRecorder`],
//! callers read a [`snapshot::FrequencyListMetricsSnapshot`] and hand it to a
//! [`traits::MetricsExporter`] such as [`exporter::PrometheusTextExporter`].
//!
//! ```
//! use freqlist::FrequencyList;
//!
//! let mut list = FrequencyList::new();
//! list.update("a").update("a").update("b");
//! list.remove_least_frequent(1, None);
//!
//! let snapshot = list.metrics_snapshot();
//! assert_eq!(snapshot.update_calls, 3);
//! assert_eq!(snapshot.update_promoted, 1);
//! assert_eq!(snapshot.frequency_evicted, 1);
//! assert_eq!(snapshot.len, 1);
//! ```

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
