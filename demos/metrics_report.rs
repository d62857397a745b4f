//! Exports frequency list counters in Prometheus text format.
//!
//! Run with: `cargo run --example metrics_report --features metrics`

use std::io;

use freqlist::FrequencyList;
use freqlist::metrics::exporter::PrometheusTextExporter;
use freqlist::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};

fn main() {
    let mut list = FrequencyList::new();
    for i in 0..1_000u32 {
        list.update(i % 97);
        if i % 10 == 0 {
            list.remove(&(i % 13));
        }
    }
    list.remove_least_frequent(20, None);
    let _ = list.remove_overall_least_recent(5);

    let exporter = PrometheusTextExporter::new("freqlist", io::stdout());
    exporter.export(&list.snapshot());
}
