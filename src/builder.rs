//! Builder for frequency lists with capacity hints and an optional clock.
//!
//! ## Example
//!
//! ```rust
//! use freqlist::builder::FrequencyListBuilder;
//! use freqlist::clock::SystemClock;
//!
//! // Frequency-only, sized for roughly 10k distinct elements
//! let mut plain = FrequencyListBuilder::new().capacity(10_000).build::<u64>();
//! plain.update(7);
//!
//! // With overall recency tracking
//! let mut timed = FrequencyListBuilder::new()
//!     .clock(SystemClock::new())
//!     .build::<String>();
//! timed.update("session".to_string());
//! assert!(timed.has_recency());
//! ```

use std::hash::Hash;

use crate::clock::{Clock, SystemClock};
use crate::ds::bucket_chain::DEFAULT_BUCKET_PREALLOC;
use crate::frequency_list::FrequencyList;

/// Builder for [`FrequencyList`] instances.
///
/// The clock decides whether overall recency is tracked: without one, every
/// recency operation on the built list returns
/// [`FeatureNotEnabled`](crate::error::FeatureNotEnabled).
#[derive(Debug, Clone)]
pub struct FrequencyListBuilder<C = SystemClock> {
    capacity: usize,
    bucket_hint: usize,
    clock: Option<C>,
}

impl FrequencyListBuilder {
    /// Create a builder for a frequency-only list with no preallocation.
    pub fn new() -> Self {
        Self {
            capacity: 0,
            bucket_hint: DEFAULT_BUCKET_PREALLOC,
            clock: None,
        }
    }
}

impl Default for FrequencyListBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FrequencyListBuilder<C> {
    /// Preallocate room for `capacity` distinct elements.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Preallocate room for `buckets` distinct access counts.
    pub fn bucket_hint(mut self, buckets: usize) -> Self {
        self.bucket_hint = buckets;
        self
    }

    /// Enable overall recency tracking driven by `clock`.
    pub fn clock<C2: Clock>(self, clock: C2) -> FrequencyListBuilder<C2> {
        FrequencyListBuilder {
            capacity: self.capacity,
            bucket_hint: self.bucket_hint,
            clock: Some(clock),
        }
    }

    /// Build the list.
    ///
    /// # Type Parameters
    ///
    /// - `T`: Element type, must be `Eq + Hash + Clone`
    pub fn build<T>(self) -> FrequencyList<T, C>
    where
        T: Eq + Hash + Clone,
    {
        FrequencyList::from_parts(self.capacity, self.bucket_hint, self.clock)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_builder_without_clock_is_frequency_only() {
        let mut list = FrequencyListBuilder::new()
            .capacity(64)
            .bucket_hint(4)
            .build::<u32>();
        assert!(!list.has_recency());

        for i in 0..10 {
            list.update(i % 3);
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.frequency(&0), Some(4));
        assert!(list.remove_overall_least_recent(1).is_err());
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_builder_with_clock_tracks_recency() {
        let clock = Rc::new(ManualClock::new());
        let mut list = FrequencyListBuilder::new()
            .clock(Rc::clone(&clock))
            .build::<&str>();
        assert!(list.has_recency());

        list.update("a");
        clock.advance(Duration::from_secs(2));
        list.update("b");
        assert_eq!(
            list.last_touched("b").unwrap(),
            Some(Duration::from_secs(2))
        );
        assert_eq!(list.remove_overall_least_recent(1).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_builder_settings_survive_clock_swap() {
        let builder = FrequencyListBuilder::new()
            .capacity(128)
            .bucket_hint(8)
            .clock(ManualClock::new());
        assert_eq!(builder.capacity, 128);
        assert_eq!(builder.bucket_hint, 8);

        let list = builder.build::<u64>();
        assert!(list.is_empty());
        assert_eq!(list.bucket_count(), 0);
    }

    #[test]
    fn test_builder_zero_hints() {
        let mut list = FrequencyListBuilder::new()
            .capacity(0)
            .bucket_hint(0)
            .build::<u8>();
        list.update(1).update(1).update(2);
        assert_eq!(list.bucket_count(), 2);
        list.check_invariants().unwrap();
    }
}
