#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyListMetricsSnapshot {
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

    // gauges captured at snapshot time
    pub len: usize,
    pub bucket_count: usize,
}
