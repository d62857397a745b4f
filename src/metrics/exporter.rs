use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::FrequencyListMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for frequency list metrics snapshots.
///
/// Writes in the Prometheus text exposition format so the output can be
/// scraped directly or forwarded to a collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", suffix, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", suffix, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<FrequencyListMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &FrequencyListMetricsSnapshot) {
        self.write_counter("update_calls_total", snapshot.update_calls);
        self.write_counter("update_new_total", snapshot.update_new);
        self.write_counter("update_promoted_total", snapshot.update_promoted);
        self.write_counter("remove_calls_total", snapshot.remove_calls);
        self.write_counter("remove_found_total", snapshot.remove_found);
        self.write_counter("frequency_evict_calls_total", snapshot.frequency_evict_calls);
        self.write_counter("frequency_evicted_total", snapshot.frequency_evicted);
        self.write_counter("recency_evict_calls_total", snapshot.recency_evict_calls);
        self.write_counter("recency_evicted_total", snapshot.recency_evicted);
        self.write_counter("window_evict_calls_total", snapshot.window_evict_calls);
        self.write_counter("window_evicted_total", snapshot.window_evicted);
        self.write_counter("feature_refusals_total", snapshot.feature_refusals);
        self.write_counter("clear_calls_total", snapshot.clear_calls);
        self.write_gauge("len", snapshot.len as u64);
        self.write_gauge("bucket_count", snapshot.bucket_count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_prefixed_counters_and_gauges() {
        let exporter = PrometheusTextExporter::new("freqlist", Vec::new());
        let snapshot = FrequencyListMetricsSnapshot {
            update_calls: 4,
            frequency_evicted: 2,
            len: 3,
            ..Default::default()
        };
        exporter.export(&snapshot);

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE freqlist_update_calls_total counter"));
        assert!(text.contains("freqlist_update_calls_total 4"));
        assert!(text.contains("freqlist_frequency_evicted_total 2"));
        assert!(text.contains("# TYPE freqlist_len gauge"));
        assert!(text.contains("freqlist_len 3"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&FrequencyListMetricsSnapshot::default());
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("\nbucket_count 0\n"));
    }
}
