use crate::metrics::traits::{FrequencyListMetricsRecorder, MetricsReset};

#[derive(Debug, Default, Clone)]
pub struct FrequencyListMetrics {
    pub update_calls: u64,
    pub update_new: u64,
    pub update_promoted: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub frequency_evict_calls: u64,
    pub frequency_evicted: u64,
    pub recency_evict_calls: u64,
    pub recency_evicted: u64,
    pub window_evict_calls: u64,
    pub window_evicted: u64,
    pub feature_refusals: u64,
    pub clear_calls: u64,
}

impl FrequencyListMetricsRecorder for FrequencyListMetrics {
    fn record_update_new(&mut self) {
        self.update_calls += 1;
        self.update_new += 1;
    }

    fn record_update_promoted(&mut self) {
        self.update_calls += 1;
        self.update_promoted += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_frequency_eviction(&mut self, removed: usize) {
        self.frequency_evict_calls += 1;
        self.frequency_evicted += removed as u64;
    }

    fn record_recency_eviction(&mut self, removed: usize) {
        self.recency_evict_calls += 1;
        self.recency_evicted += removed as u64;
    }

    fn record_window_eviction(&mut self, removed: usize) {
        self.window_evict_calls += 1;
        self.window_evicted += removed as u64;
    }

    fn record_feature_refusal(&mut self) {
        self.feature_refusals += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl MetricsReset for FrequencyListMetrics {
    fn reset_metrics(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_counters_split_new_and_promoted() {
        let mut metrics = FrequencyListMetrics::default();
        metrics.record_update_new();
        metrics.record_update_promoted();
        metrics.record_update_promoted();
        assert_eq!(metrics.update_calls, 3);
        assert_eq!(metrics.update_new, 1);
        assert_eq!(metrics.update_promoted, 2);
    }

    #[test]
    fn eviction_counters_accumulate_yield() {
        let mut metrics = FrequencyListMetrics::default();
        metrics.record_frequency_eviction(3);
        metrics.record_frequency_eviction(0);
        metrics.record_window_eviction(5);
        assert_eq!(metrics.frequency_evict_calls, 2);
        assert_eq!(metrics.frequency_evicted, 3);
        assert_eq!(metrics.window_evict_calls, 1);
        assert_eq!(metrics.window_evicted, 5);
        assert_eq!(metrics.recency_evict_calls, 0);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut metrics = FrequencyListMetrics::default();
        metrics.record_remove_call();
        metrics.record_remove_found();
        metrics.record_feature_refusal();
        metrics.reset_metrics();
        assert_eq!(metrics.remove_calls, 0);
        assert_eq!(metrics.remove_found, 0);
        assert_eq!(metrics.feature_refusals, 0);
    }
}
