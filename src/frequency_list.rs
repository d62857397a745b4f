//! Frequency list for O(1) LFU / MFU ordering with optional overall recency.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                        FrequencyList<T, C> Layout                           │
//! │                                                                             │
//! │   ┌─────────────────────────────┐   ┌─────────────────────────────────┐     │
//! │   │  index: FxHashMap<T,SlotId> │   │  records: SlotArena<Record>     │     │
//! │   │                             │   │                                 │     │
//! │   │   "a" ──► id_0              │──►│  id_0 { bucket, in_bucket,      │     │
//! │   │   "b" ──► id_1              │   │         overall, touched_at }   │     │
//! │   └─────────────────────────────┘   └─────────────────────────────────┘     │
//! │                                                                             │
//! │   chain: BucketChain (ring closed by the count-0 sentinel)                  │
//! │                                                                             │
//! │     [0] ──► [count 1: b ◄─► d] ──► [count 2: a] ──► [count 4: c] ──► [0]    │
//! │              oldest      newest                                             │
//! │                                                                             │
//! │   tracking: Recency { clock, chain }   (or FrequencyOnly)                   │
//! │                                                                             │
//! │     oldest ──► [d] ◄─► [b] ◄─► [c] ◄─► [a] ◄── newest   (last touch time)   │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Composing each bucket's sublist with the bucket chain gives one total order
//! from "least frequent, least recent" to "most frequent, most recent": step to
//! the next-newer record of the same bucket, or, at the newest record, to the
//! oldest record of the next higher bucket. Every bulk removal and iterator
//! walks that order (or the overall recency chain) one O(1) step at a time.
//!
//! ## Operations
//!
//! | Operation                                  | Time          | Notes                          |
//! |--------------------------------------------|---------------|--------------------------------|
//! | `update`                                   | O(1) amort.   | Insert at 1 or move to count+1 |
//! | `remove` / `contains` / `frequency`        | O(1) expected | Via the lookup index           |
//! | `remove_least_frequent(n, skip)`           | O(n)          | Walks from the bottom bucket   |
//! | `remove_most_frequent(n, skip)`            | O(n)          | Walks from the top bucket      |
//! | `remove_overall_least_recent(n)`           | O(n)          | Needs a clock                  |
//! | `remove_overall_least_recent_outside(d)`   | O(removed)    | Stops at first fresh record    |
//! | `least_to_most_frequent` and friends       | O(1) per step | Lazy, borrows the list         |
//!
//! ## Example Usage
//!
//! ```
//! use freqlist::FrequencyList;
//!
//! let mut list = FrequencyList::new();
//! list.update("a").update("b").update("a");
//!
//! assert_eq!(list.frequency("a"), Some(2));
//! assert_eq!(list.remove_least_frequent(1, None), vec!["b"]);
//! assert_eq!(list.len(), 1);
//! ```
//!
//! ## Thread Safety
//!
//! `FrequencyList` is a single-owner structure with no internal locking.
//! Callers sharing one across threads must serialize access themselves (a
//! mutex around the owning cache, or confinement to one task). Iterators
//! borrow the list, so it cannot be mutated while a traversal is open.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::Rev;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::builder::FrequencyListBuilder;
use crate::clock::{Clock, SystemClock};
use crate::ds::bucket_chain::{BucketChain, DEFAULT_BUCKET_PREALLOC, SENTINEL};
use crate::ds::links::{self, Ends, LinkField, Links};
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::{FeatureNotEnabled, InvariantError};
use crate::iter::Iter;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::FrequencyListMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::FrequencyListMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{FrequencyListMetricsRecorder, MetricsReset, MetricsSnapshotProvider};

/// One tracked element.
///
/// `touched_at` is `Some` exactly when the record is linked into the overall
/// recency chain.
#[derive(Debug)]
pub(crate) struct Record<T, I> {
    pub(crate) value: T,
    bucket: SlotId,
    in_bucket: Links,
    overall: Links,
    touched_at: Option<I>,
}

struct InBucket;
struct Overall;

impl<T, I> LinkField<Record<T, I>> for InBucket {
    #[inline]
    fn links(record: &Record<T, I>) -> &Links {
        &record.in_bucket
    }

    #[inline]
    fn links_mut(record: &mut Record<T, I>) -> &mut Links {
        &mut record.in_bucket
    }
}

impl<T, I> LinkField<Record<T, I>> for Overall {
    #[inline]
    fn links(record: &Record<T, I>) -> &Links {
        &record.overall
    }

    #[inline]
    fn links_mut(record: &mut Record<T, I>) -> &mut Links {
        &mut record.overall
    }
}

/// Which orders this list maintains, fixed at construction.
enum Tracking<C> {
    FrequencyOnly,
    Recency { clock: C, chain: Ends },
}

/// One O(1) move through the list; `None` past the last record.
pub(crate) type Step<T, C> = fn(&FrequencyList<T, C>, SlotId) -> Option<SlotId>;

/// O(1) access-frequency tracker with optional overall recency order.
///
/// Every [`update`](Self::update) bumps an element's access count by one
/// (inserting it at count 1 if absent) and makes it the most recent element
/// of its count. Lists built with a [`Clock`] also keep every element in one
/// overall recency chain stamped with the time of its last update.
///
/// # Type Parameters
///
/// - `T`: Element type, must be `Eq + Hash + Clone`
/// - `C`: [`Clock`] used for overall recency; unused by frequency-only lists
///
/// # Example
///
/// ```
/// use freqlist::FrequencyList;
///
/// let mut list = FrequencyList::new();
/// for page in ["home", "docs", "home", "blog", "home", "docs"] {
///     list.update(page);
/// }
///
/// let order: Vec<_> = list.least_to_most_frequent().copied().collect();
/// assert_eq!(order, vec!["blog", "docs", "home"]);
///
/// // Evict the two coldest pages, but never the docs page
/// let evicted = list.remove_least_frequent(2, Some(&"docs"));
/// assert_eq!(evicted, vec!["blog", "home"]);
/// assert!(list.contains("docs"));
/// ```
///
/// # Use Case: LFU with TTL
///
/// ```
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// use freqlist::FrequencyList;
/// use freqlist::clock::ManualClock;
///
/// let clock = Rc::new(ManualClock::new());
/// let mut list = FrequencyList::with_clock(Rc::clone(&clock));
///
/// list.update(1).update(1).update(2);
/// clock.advance(Duration::from_secs(30));
/// list.update(3);
///
/// // Anything idle for more than 10s goes first, hot or not
/// let expired = list
///     .remove_overall_least_recent_outside(Duration::from_secs(10))
///     .unwrap();
/// assert_eq!(expired, vec![1, 2]);
/// assert_eq!(list.len(), 1);
/// ```
pub struct FrequencyList<T, C: Clock = SystemClock> {
    records: SlotArena<Record<T, C::Instant>>,
    index: FxHashMap<T, SlotId>,
    chain: BucketChain,
    tracking: Tracking<C>,
    #[cfg(feature = "metrics")]
    metrics: FrequencyListMetrics,
}

impl<T> FrequencyList<T>
where
    T: Eq + Hash + Clone,
{
    /// Creates an empty frequency-only list.
    ///
    /// # Example
    ///
    /// ```
    /// use freqlist::FrequencyList;
    ///
    /// let list: FrequencyList<&str> = FrequencyList::new();
    /// assert!(list.is_empty());
    /// assert!(!list.has_recency());
    /// ```
    pub fn new() -> Self {
        Self::frequency_only()
    }

    /// Creates an empty frequency-only list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(capacity, DEFAULT_BUCKET_PREALLOC, None)
    }

    /// Returns a builder for configuring capacity hints and a clock.
    ///
    /// # Example
    ///
    /// ```
    /// use freqlist::FrequencyList;
    /// use freqlist::clock::ManualClock;
    ///
    /// let list: FrequencyList<u64, ManualClock> = FrequencyList::<u64>::builder()
    ///     .capacity(1024)
    ///     .clock(ManualClock::new())
    ///     .build();
    /// assert!(list.has_recency());
    /// ```
    pub fn builder() -> FrequencyListBuilder {
        FrequencyListBuilder::new()
    }
}

impl<T> Default for FrequencyList<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> FrequencyList<T, C>
where
    T: Eq + Hash + Clone,
    C: Clock,
{
    pub(crate) fn from_parts(capacity: usize, bucket_hint: usize, clock: Option<C>) -> Self {
        let tracking = match clock {
            Some(clock) => Tracking::Recency {
                clock,
                chain: Ends::default(),
            },
            None => Tracking::FrequencyOnly,
        };
        Self {
            records: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            chain: BucketChain::with_capacity(bucket_hint),
            tracking,
            #[cfg(feature = "metrics")]
            metrics: FrequencyListMetrics::default(),
        }
    }

    /// Creates an empty frequency-only list for any clock type parameter.
    ///
    /// Useful when the list type is fixed by a caller that sometimes runs
    /// without recency tracking.
    pub fn frequency_only() -> Self {
        Self::from_parts(0, DEFAULT_BUCKET_PREALLOC, None)
    }

    /// Creates an empty list that also tracks overall recency using `clock`.
    ///
    /// # Example
    ///
    /// ```
    /// use freqlist::FrequencyList;
    /// use freqlist::clock::SystemClock;
    ///
    /// let mut list = FrequencyList::with_clock(SystemClock::new());
    /// list.update("a");
    /// assert_eq!(list.overall_most_to_least_recent().unwrap().next(), Some(&"a"));
    /// ```
    pub fn with_clock(clock: C) -> Self {
        Self::from_parts(0, DEFAULT_BUCKET_PREALLOC, Some(clock))
    }

    /// Returns the number of tracked elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no elements are tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if this list was built with a clock.
    pub fn has_recency(&self) -> bool {
        matches!(self.tracking, Tracking::Recency { .. })
    }

    /// Returns the number of distinct access counts currently present.
    pub fn bucket_count(&self) -> usize {
        self.chain.len()
    }

    /// Returns `true` if `value` is tracked.
    ///
    /// # Example
    ///
    /// ```
    /// use freqlist::FrequencyList;
    ///
    /// let mut list = FrequencyList::new();
    /// list.update("key".to_string());
    ///
    /// // Query with &str instead of String
    /// assert!(list.contains("key"));
    /// assert!(!list.contains("missing"));
    /// ```
    #[inline]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.contains_key(value)
    }

    /// Returns the access count of `value`, if tracked.
    ///
    /// # Example
    ///
    /// ```
    /// use freqlist::FrequencyList;
    ///
    /// let mut list = FrequencyList::new();
    /// list.update("key").update("key").update("key");
    ///
    /// assert_eq!(list.frequency(&"key"), Some(3));
    /// assert_eq!(list.frequency(&"missing"), None);
    /// ```
    pub fn frequency<Q>(&self, value: &Q) -> Option<u64>
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let id = *self.index.get(value)?;
        let bucket = self.records.get(id)?.bucket;
        self.chain.get(bucket).map(|bucket| bucket.count)
    }

    /// Returns when `value` was last updated, or `Ok(None)` if it is not tracked.
    pub fn last_touched<Q>(&self, value: &Q) -> Result<Option<C::Instant>, FeatureNotEnabled>
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.recency_chain("last_touched")?;
        Ok(self
            .index
            .get(value)
            .and_then(|id| self.records.get(*id))
            .and_then(|record| record.touched_at))
    }

    /// Returns the smallest access count present.
    pub fn min_frequency(&self) -> Option<u64> {
        let lowest = self.chain.lowest()?;
        self.chain.get(lowest).map(|bucket| bucket.count)
    }

    /// Returns the largest access count present.
    pub fn max_frequency(&self) -> Option<u64> {
        let highest = self.chain.highest()?;
        self.chain.get(highest).map(|bucket| bucket.count)
    }

    /// Returns the next element [`remove_least_frequent`](Self::remove_least_frequent)
    /// would take, without removing it.
    pub fn peek_least_frequent(&self) -> Option<&T> {
        self.value_at(self.least_frequent_id()?)
    }

    /// Returns the next element [`remove_most_frequent`](Self::remove_most_frequent)
    /// would take, without removing it.
    pub fn peek_most_frequent(&self) -> Option<&T> {
        self.value_at(self.most_frequent_id()?)
    }

    /// Records one access of `value`.
    ///
    /// An untracked value enters with count 1; a tracked one moves to
    /// count + 1. Either way it becomes the most recent element of its count
    /// and, with recency enabled, the most recent element overall. A value already
    /// at `u64::MAX` keeps its count and only has its recency refreshed.
    ///
    /// # Example
    ///
    /// ```
    /// use freqlist::FrequencyList;
    ///
    /// let mut list = FrequencyList::new();
    /// list.update("a").update("b").update("a");
    ///
    /// assert_eq!(list.frequency(&"a"), Some(2));
    /// assert_eq!(list.frequency(&"b"), Some(1));
    /// assert_eq!(list.bucket_count(), 2);
    /// ```
    pub fn update(&mut self, value: T) -> &mut Self {
        match self.index.get(&value).copied() {
            Some(id) => {
                let promoted = self.promote(id);
                debug_assert!(promoted.is_some(), "tracked record detached from its bucket");
                #[cfg(feature = "metrics")]
                self.metrics.record_update_promoted();
            },
            None => {
                let inserted = self.insert_record(value);
                debug_assert!(inserted.is_some(), "failed to link a new record");
                #[cfg(feature = "metrics")]
                self.metrics.record_update_new();
            },
        }
        self
    }

    /// Stops tracking `value`. Absent values are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use freqlist::FrequencyList;
    ///
    /// let mut list = FrequencyList::new();
    /// list.update("a").update("b");
    /// list.remove("a").remove("missing");
    ///
    /// assert!(!list.contains("a"));
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> &mut Self
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();
        if let Some(id) = self.index.get(value).copied() {
            let removed = self.remove_id(id);
            debug_assert!(removed.is_some(), "indexed record missing from arena");
            #[cfg(feature = "metrics")]
            self.metrics.record_remove_found();
        }
        self
    }

    /// Removes up to `n` elements starting from the least frequent (oldest
    /// first within a count), never removing `skip`.
    ///
    /// The skipped element does not count toward `n`. Returns the removed
    /// elements in the order they were visited.
    ///
    /// # Example
    ///
    /// ```
    /// use freqlist::FrequencyList;
    ///
    /// let mut list = FrequencyList::new();
    /// list.update("a").update("b").update("c").update("c");
    ///
    /// assert_eq!(list.remove_least_frequent(2, Some(&"a")), vec!["b", "c"]);
    /// assert_eq!(list.remove_least_frequent(5, None), vec!["a"]);
    /// assert!(list.is_empty());
    /// ```
    pub fn remove_least_frequent(&mut self, n: usize, skip: Option<&T>) -> Vec<T> {
        let skip = skip.and_then(|value| self.index.get(value).copied());
        let start = self.least_frequent_id();
        let removed = self.remove_walk(start, Self::toward_more_frequent, n, skip, |_| true);
        debug!(
            operation = "remove_least_frequent",
            limit = n,
            removed = removed.len(),
            "bulk removal"
        );
        #[cfg(feature = "metrics")]
        self.metrics.record_frequency_eviction(removed.len());
        removed
    }

    /// Removes up to `n` elements starting from the most frequent (newest
    /// first within a count), never removing `skip`.
    pub fn remove_most_frequent(&mut self, n: usize, skip: Option<&T>) -> Vec<T> {
        let skip = skip.and_then(|value| self.index.get(value).copied());
        let start = self.most_frequent_id();
        let removed = self.remove_walk(start, Self::toward_less_frequent, n, skip, |_| true);
        debug!(
            operation = "remove_most_frequent",
            limit = n,
            removed = removed.len(),
            "bulk removal"
        );
        #[cfg(feature = "metrics")]
        self.metrics.record_frequency_eviction(removed.len());
        removed
    }

    /// Removes and returns the least frequent element.
    pub fn pop_least_frequent(&mut self) -> Option<T> {
        self.remove_least_frequent(1, None).into_iter().next()
    }

    /// Removes and returns the most frequent element.
    pub fn pop_most_frequent(&mut self) -> Option<T> {
        self.remove_most_frequent(1, None).into_iter().next()
    }

    /// Iterates from the least frequent, least recent element to the most
    /// frequent, most recent one.
    pub fn least_to_most_frequent(&self) -> Iter<'_, T, C> {
        Iter::new(
            self,
            self.least_frequent_id(),
            self.most_frequent_id(),
            Self::toward_more_frequent,
            Self::toward_less_frequent,
        )
    }

    /// The exact reverse of [`least_to_most_frequent`](Self::least_to_most_frequent).
    pub fn most_to_least_frequent(&self) -> Rev<Iter<'_, T, C>> {
        self.least_to_most_frequent().rev()
    }

    /// Removes up to `n` elements in order of oldest last touch.
    ///
    /// # Errors
    ///
    /// [`FeatureNotEnabled`] if the list was built without a clock.
    pub fn remove_overall_least_recent(&mut self, n: usize) -> Result<Vec<T>, FeatureNotEnabled> {
        const OP: &str = "remove_overall_least_recent";
        let (chain, _) = self.recency_view(OP, Duration::ZERO)?;
        let removed = self.remove_walk(chain.oldest, Self::toward_more_recent, n, None, |_| true);
        debug!(operation = OP, limit = n, removed = removed.len(), "bulk removal");
        #[cfg(feature = "metrics")]
        self.metrics.record_recency_eviction(removed.len());
        Ok(removed)
    }

    /// Removes up to `n` elements in order of newest last touch.
    ///
    /// # Errors
    ///
    /// [`FeatureNotEnabled`] if the list was built without a clock.
    pub fn remove_overall_most_recent(&mut self, n: usize) -> Result<Vec<T>, FeatureNotEnabled> {
        const OP: &str = "remove_overall_most_recent";
        let (chain, _) = self.recency_view(OP, Duration::ZERO)?;
        let removed = self.remove_walk(chain.newest, Self::toward_less_recent, n, None, |_| true);
        debug!(operation = OP, limit = n, removed = removed.len(), "bulk removal");
        #[cfg(feature = "metrics")]
        self.metrics.record_recency_eviction(removed.len());
        Ok(removed)
    }

    /// Removes every element last touched strictly before `now - window`,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// [`FeatureNotEnabled`] if the list was built without a clock.
    pub fn remove_overall_least_recent_outside(
        &mut self,
        window: Duration,
    ) -> Result<Vec<T>, FeatureNotEnabled> {
        const OP: &str = "remove_overall_least_recent_outside";
        let (chain, cutoff) = self.recency_view(OP, window)?;
        let removed = self.remove_walk(
            chain.oldest,
            Self::toward_more_recent,
            usize::MAX,
            None,
            move |record| record.touched_at.is_some_and(|at| at < cutoff),
        );
        debug!(operation = OP, ?window, removed = removed.len(), "bulk removal");
        #[cfg(feature = "metrics")]
        self.metrics.record_window_eviction(removed.len());
        Ok(removed)
    }

    /// Removes every element last touched at or after `now - window`,
    /// newest first.
    ///
    /// # Errors
    ///
    /// [`FeatureNotEnabled`] if the list was built without a clock.
    pub fn remove_overall_most_recent_within(
        &mut self,
        window: Duration,
    ) -> Result<Vec<T>, FeatureNotEnabled> {
        const OP: &str = "remove_overall_most_recent_within";
        let (chain, cutoff) = self.recency_view(OP, window)?;
        let removed = self.remove_walk(
            chain.newest,
            Self::toward_less_recent,
            usize::MAX,
            None,
            move |record| record.touched_at.is_some_and(|at| at >= cutoff),
        );
        debug!(operation = OP, ?window, removed = removed.len(), "bulk removal");
        #[cfg(feature = "metrics")]
        self.metrics.record_window_eviction(removed.len());
        Ok(removed)
    }

    /// Iterates from the element with the oldest last touch to the newest.
    ///
    /// # Errors
    ///
    /// [`FeatureNotEnabled`] if the list was built without a clock.
    pub fn overall_least_to_most_recent(&self) -> Result<Iter<'_, T, C>, FeatureNotEnabled> {
        let chain = self.recency_chain("overall_least_to_most_recent")?;
        Ok(self.recency_iter(chain))
    }

    /// Iterates from the element with the newest last touch to the oldest.
    ///
    /// # Errors
    ///
    /// [`FeatureNotEnabled`] if the list was built without a clock.
    pub fn overall_most_to_least_recent(
        &self,
    ) -> Result<Rev<Iter<'_, T, C>>, FeatureNotEnabled> {
        let chain = self.recency_chain("overall_most_to_least_recent")?;
        Ok(self.recency_iter(chain).rev())
    }

    /// Stops tracking every element. The clock, if any, is kept.
    pub fn clear(&mut self) {
        self.records.truncate(0);
        self.index.clear();
        self.chain.clear();
        if let Tracking::Recency { chain, .. } = &mut self.tracking {
            *chain = Ends::default();
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Releases spare capacity held by the arenas and the index.
    pub fn shrink_to_fit(&mut self) {
        self.records.shrink_to_fit();
        self.index.shrink_to_fit();
        self.chain.shrink_to_fit();
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.records.approx_bytes()
            + self.index.capacity() * std::mem::size_of::<(T, SlotId)>()
            + self.chain.approx_bytes()
    }

    /// Verifies every structural invariant of the list.
    ///
    /// Intended for tests and fuzzing; runs in O(n).
    ///
    /// # Errors
    ///
    /// An [`InvariantError`] describing the first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.records.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "arena holds {} records but index holds {}",
                self.records.len(),
                self.index.len()
            )));
        }
        for (value, &id) in &self.index {
            match self.records.get(id) {
                Some(record) if record.value == *value => {},
                _ => return Err(InvariantError::new("index entry does not match its record")),
            }
        }

        let mut previous_count = 0u64;
        let mut buckets_seen = 0usize;
        let mut members_seen = 0usize;
        for (id, bucket) in self.chain.iter() {
            if bucket.count <= previous_count {
                return Err(InvariantError::new(format!(
                    "bucket count {} follows {}",
                    bucket.count, previous_count
                )));
            }
            let lower_higher = self.chain.get(bucket.lower).map(|lower| lower.higher);
            let higher_lower = self.chain.get(bucket.higher).map(|higher| higher.lower);
            if lower_higher != Some(id) || higher_lower != Some(id) {
                return Err(InvariantError::new(format!(
                    "bucket {} has asymmetric neighbour links",
                    bucket.count
                )));
            }
            let Some(members) = links::checked_len::<_, InBucket>(&self.records, &bucket.members)
            else {
                return Err(InvariantError::new(format!(
                    "bucket {} has a broken member list",
                    bucket.count
                )));
            };
            if members == 0 {
                return Err(InvariantError::new(format!("bucket {} is empty", bucket.count)));
            }
            let mut current = bucket.members.oldest;
            while let Some(member) = current {
                let record = self
                    .records
                    .get(member)
                    .ok_or_else(|| InvariantError::new("bucket member slot is free"))?;
                if record.bucket != id {
                    return Err(InvariantError::new(format!(
                        "record in bucket {} points at another bucket",
                        bucket.count
                    )));
                }
                current = record.in_bucket.newer;
            }
            previous_count = bucket.count;
            buckets_seen += 1;
            members_seen += members;
        }
        if buckets_seen + 1 != self.chain.slot_count() {
            return Err(InvariantError::new("bucket arena holds unlinked buckets"));
        }
        if members_seen != self.records.len() {
            return Err(InvariantError::new(format!(
                "buckets hold {} records but arena holds {}",
                members_seen,
                self.records.len()
            )));
        }

        match &self.tracking {
            Tracking::FrequencyOnly => {
                if self.records.iter().any(|(_, record)| record.touched_at.is_some()) {
                    return Err(InvariantError::new("frequency-only record carries a timestamp"));
                }
            },
            Tracking::Recency { chain, .. } => {
                let linked = links::checked_len::<_, Overall>(&self.records, chain)
                    .ok_or_else(|| InvariantError::new("overall recency chain is broken"))?;
                if linked != self.records.len() {
                    return Err(InvariantError::new(format!(
                        "overall recency chain links {} of {} records",
                        linked,
                        self.records.len()
                    )));
                }
                let mut previous = None;
                let mut current = chain.oldest;
                while let Some(id) = current {
                    let record = self
                        .records
                        .get(id)
                        .ok_or_else(|| InvariantError::new("recency chain slot is free"))?;
                    let Some(at) = record.touched_at else {
                        return Err(InvariantError::new("linked record has no timestamp"));
                    };
                    if previous.is_some_and(|before| before > at) {
                        return Err(InvariantError::new("overall recency chain is out of order"));
                    }
                    previous = Some(at);
                    current = record.overall.newer;
                }
            },
        }
        Ok(())
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> FrequencyListMetricsSnapshot {
        FrequencyListMetricsSnapshot {
            update_calls: self.metrics.update_calls,
            update_new: self.metrics.update_new,
            update_promoted: self.metrics.update_promoted,
            remove_calls: self.metrics.remove_calls,
            remove_found: self.metrics.remove_found,
            frequency_evict_calls: self.metrics.frequency_evict_calls,
            frequency_evicted: self.metrics.frequency_evicted,
            recency_evict_calls: self.metrics.recency_evict_calls,
            recency_evicted: self.metrics.recency_evicted,
            window_evict_calls: self.metrics.window_evict_calls,
            window_evicted: self.metrics.window_evicted,
            feature_refusals: self.metrics.feature_refusals,
            clear_calls: self.metrics.clear_calls,
            len: self.len(),
            bucket_count: self.bucket_count(),
        }
    }

    #[inline]
    pub(crate) fn value_at(&self, id: SlotId) -> Option<&T> {
        self.records.get(id).map(|record| &record.value)
    }

    fn least_frequent_id(&self) -> Option<SlotId> {
        self.chain.get(self.chain.lowest()?)?.members.oldest
    }

    fn most_frequent_id(&self) -> Option<SlotId> {
        self.chain.get(self.chain.highest()?)?.members.newest
    }

    /// Next-newer record of the same bucket, crossing into the oldest record
    /// of the next higher bucket at the boundary.
    fn toward_more_frequent(&self, id: SlotId) -> Option<SlotId> {
        let record = self.records.get(id)?;
        record.in_bucket.newer.or_else(|| {
            let higher = self.chain.next_higher(record.bucket)?;
            self.chain.get(higher)?.members.oldest
        })
    }

    fn toward_less_frequent(&self, id: SlotId) -> Option<SlotId> {
        let record = self.records.get(id)?;
        record.in_bucket.older.or_else(|| {
            let lower = self.chain.next_lower(record.bucket)?;
            self.chain.get(lower)?.members.newest
        })
    }

    fn toward_more_recent(&self, id: SlotId) -> Option<SlotId> {
        self.records.get(id)?.overall.newer
    }

    fn toward_less_recent(&self, id: SlotId) -> Option<SlotId> {
        self.records.get(id)?.overall.older
    }

    fn recency_chain(&self, operation: &'static str) -> Result<Ends, FeatureNotEnabled> {
        match &self.tracking {
            Tracking::Recency { chain, .. } => Ok(*chain),
            Tracking::FrequencyOnly => Err(FeatureNotEnabled::new(operation)),
        }
    }

    /// The overall chain ends and `now - window`, or the refusal for `operation`.
    fn recency_view(
        &mut self,
        operation: &'static str,
        window: Duration,
    ) -> Result<(Ends, C::Instant), FeatureNotEnabled> {
        match &self.tracking {
            Tracking::Recency { clock, chain } => Ok((*chain, clock.earlier(window))),
            Tracking::FrequencyOnly => {
                #[cfg(feature = "metrics")]
                self.metrics.record_feature_refusal();
                Err(FeatureNotEnabled::new(operation))
            },
        }
    }

    fn recency_iter(&self, chain: Ends) -> Iter<'_, T, C> {
        Iter::new(
            self,
            chain.oldest,
            chain.newest,
            Self::toward_more_recent,
            Self::toward_less_recent,
        )
    }

    /// Links a new record into its bucket and the overall chain, indexing it
    /// only once both succeed. On failure nothing of the value stays tracked.
    fn insert_record(&mut self, value: T) -> Option<SlotId> {
        let bucket = self.chain.insert_after(SENTINEL)?;
        let id = self.records.insert(Record {
            value: value.clone(),
            bucket,
            in_bucket: Links::default(),
            overall: Links::default(),
            touched_at: None,
        });
        let linked = match self.chain.get_mut(bucket) {
            Some(target) => {
                links::push_newest::<_, InBucket>(&mut self.records, &mut target.members, id)
            },
            None => None,
        };
        if linked.is_none() {
            self.records.remove(id);
            self.chain.prune_if_empty(bucket);
            return None;
        }
        if self.touch_overall(id).is_none() {
            self.remove_id(id);
            return None;
        }
        self.index.insert(value, id);
        Some(id)
    }

    /// Moves `id` to the `count + 1` bucket and returns its new count.
    fn promote(&mut self, id: SlotId) -> Option<u64> {
        let current = self.records.get(id)?.bucket;
        // Saturated counts stay in place and only refresh their recency.
        let target = self.chain.insert_after(current).unwrap_or(current);
        links::unlink::<_, InBucket>(
            &mut self.records,
            &mut self.chain.get_mut(current)?.members,
            id,
        )?;
        links::push_newest::<_, InBucket>(
            &mut self.records,
            &mut self.chain.get_mut(target)?.members,
            id,
        )?;
        self.records.get_mut(id)?.bucket = target;
        if target != current {
            self.chain.prune_if_empty(current);
        }
        self.touch_overall(id)?;
        self.chain.get(target).map(|bucket| bucket.count)
    }

    /// Restamps `id` and moves it to the newest end of the overall chain.
    ///
    /// `touched_at` is cleared while the record is detached and set only once
    /// it is linked again.
    fn touch_overall(&mut self, id: SlotId) -> Option<()> {
        let Tracking::Recency { clock, chain } = &mut self.tracking else {
            return Some(());
        };
        let now = clock.now();
        if self.records.get_mut(id)?.touched_at.take().is_some() {
            links::unlink::<_, Overall>(&mut self.records, chain, id)?;
        }
        links::push_newest::<_, Overall>(&mut self.records, chain, id)?;
        self.records.get_mut(id)?.touched_at = Some(now);
        Some(())
    }

    fn remove_id(&mut self, id: SlotId) -> Option<T> {
        let (bucket, linked) = {
            let record = self.records.get(id)?;
            (record.bucket, record.touched_at.is_some())
        };
        links::unlink::<_, InBucket>(
            &mut self.records,
            &mut self.chain.get_mut(bucket)?.members,
            id,
        )?;
        self.chain.prune_if_empty(bucket);
        if linked {
            if let Tracking::Recency { chain, .. } = &mut self.tracking {
                links::unlink::<_, Overall>(&mut self.records, chain, id)?;
            }
        }
        let record = self.records.remove(id)?;
        self.index.remove(&record.value);
        Some(record.value)
    }

    /// Walks from `start` with `step`, removing each visited record until
    /// `limit` removals, the end of the order, or the first record failing
    /// `eligible`. `skip` is stepped over without counting.
    fn remove_walk<P>(
        &mut self,
        start: Option<SlotId>,
        step: Step<T, C>,
        limit: usize,
        skip: Option<SlotId>,
        mut eligible: P,
    ) -> Vec<T>
    where
        P: FnMut(&Record<T, C::Instant>) -> bool,
    {
        let mut removed = Vec::with_capacity(limit.min(self.len()));
        let mut cursor = start;
        while removed.len() < limit {
            let Some(id) = cursor else {
                break;
            };
            // The successor is resolved before `id` (and maybe its bucket) is freed.
            cursor = step(&*self, id);
            if skip == Some(id) {
                continue;
            }
            match self.records.get(id) {
                Some(record) if eligible(record) => {},
                _ => break,
            }
            if let Some(value) = self.remove_id(id) {
                removed.push(value);
            }
        }
        removed
    }
}

impl<T, C> fmt::Debug for FrequencyList<T, C>
where
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyList")
            .field("len", &self.records.len())
            .field("buckets", &self.chain.len())
            .field("recency", &matches!(self.tracking, Tracking::Recency { .. }))
            .finish()
    }
}

impl<T, C> Extend<T> for FrequencyList<T, C>
where
    T: Eq + Hash + Clone,
    C: Clock,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for value in values {
            self.update(value);
        }
    }
}

impl<T> FromIterator<T> for FrequencyList<T>
where
    T: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut list = Self::new();
        list.extend(values);
        list
    }
}

#[cfg(feature = "metrics")]
impl<T, C> MetricsSnapshotProvider<FrequencyListMetricsSnapshot> for FrequencyList<T, C>
where
    T: Eq + Hash + Clone,
    C: Clock,
{
    fn snapshot(&self) -> FrequencyListMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<T, C> MetricsReset for FrequencyList<T, C>
where
    T: Eq + Hash + Clone,
    C: Clock,
{
    fn reset_metrics(&mut self) {
        self.metrics.reset_metrics();
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::clock::ManualClock;
    use proptest::prelude::*;
    use std::collections::HashMap;

    // =============================================================================
    // Property Tests - Core Invariants
    // =============================================================================

    proptest! {
        /// Property: Invariants hold after any sequence of operations
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_invariants_always_hold(
            ops in prop::collection::vec((0u8..5, 0u32..16, 0usize..4), 0..120)
        ) {
            let mut list: FrequencyList<u32> = FrequencyList::new();

            for (op, value, n) in ops {
                match op {
                    0 | 1 => { list.update(value); }
                    2 => { list.remove(&value); }
                    3 => { list.remove_least_frequent(n, Some(&value)); }
                    4 => { list.remove_most_frequent(n, None); }
                    _ => unreachable!(),
                }
                prop_assert!(list.check_invariants().is_ok());
            }
        }

        /// Property: Recency invariants hold while the clock advances
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_recency_invariants_always_hold(
            ops in prop::collection::vec((0u8..6, 0u32..16, 0u64..5), 0..120)
        ) {
            let clock = ManualClock::new();
            let mut list = FrequencyList::with_clock(&clock);

            for (op, value, ticks) in ops {
                clock.advance(Duration::from_secs(ticks));
                match op {
                    0 | 1 => { list.update(value); }
                    2 => { list.remove(&value); }
                    3 => { list.remove_overall_least_recent(ticks as usize).unwrap(); }
                    4 => { list.remove_overall_least_recent_outside(Duration::from_secs(ticks * 3)).unwrap(); }
                    5 => { list.remove_overall_most_recent_within(Duration::from_secs(ticks)).unwrap(); }
                    _ => unreachable!(),
                }
                prop_assert!(list.check_invariants().is_ok());
            }
        }

        /// Property: len() and frequency() match a counting model
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_counts_match_model(
            ops in prop::collection::vec((any::<bool>(), 0u32..12), 0..150)
        ) {
            let mut list: FrequencyList<u32> = FrequencyList::new();
            let mut model: HashMap<u32, u64> = HashMap::new();

            for (is_update, value) in ops {
                if is_update {
                    list.update(value);
                    *model.entry(value).or_insert(0) += 1;
                } else {
                    list.remove(&value);
                    model.remove(&value);
                }
                prop_assert_eq!(list.len(), model.len());
            }
            for (value, count) in &model {
                prop_assert_eq!(list.frequency(value), Some(*count));
            }
        }

        /// Property: Least-frequent removal never passes over a lower count
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_least_frequent_is_minimal(
            values in prop::collection::vec(0u32..10, 1..80)
        ) {
            let mut list: FrequencyList<u32> = FrequencyList::new();
            list.extend(values);

            let min = list.min_frequency().unwrap();
            let victim = list.pop_least_frequent().unwrap();
            prop_assert_eq!(list.frequency(&victim), None);
            for value in list.least_to_most_frequent() {
                prop_assert!(list.frequency(value).unwrap() >= min);
            }
        }

        /// Property: Frequency traversal is sorted by count and reversible
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_traversals_sorted_and_reversible(
            values in prop::collection::vec(0u32..20, 0..100)
        ) {
            let list: FrequencyList<u32> = values.into_iter().collect();

            let forward: Vec<u32> = list.least_to_most_frequent().copied().collect();
            let mut backward: Vec<u32> = list.most_to_least_frequent().copied().collect();
            backward.reverse();
            prop_assert_eq!(&forward, &backward);

            let counts: Vec<u64> = forward.iter().map(|v| list.frequency(v).unwrap()).collect();
            prop_assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
        }

        /// Property: The skip value survives and up to n others are removed
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_skip_is_never_removed(
            values in prop::collection::vec(0u32..10, 1..60),
            n in 0usize..12,
        ) {
            let mut list: FrequencyList<u32> = FrequencyList::new();
            list.extend(values.iter().copied());
            let skip = values[0];
            let before = list.len();

            let removed = list.remove_least_frequent(n, Some(&skip));
            prop_assert!(!removed.contains(&skip));
            prop_assert!(list.contains(&skip));
            prop_assert_eq!(removed.len(), n.min(before - 1));
        }

        /// Property: Inserting n distinct values and removing n empties the list
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_distinct_round_trip(
            values in prop::collection::hash_set(any::<u32>(), 0..50)
        ) {
            let mut list: FrequencyList<u32> = FrequencyList::new();
            list.extend(values.iter().copied());
            let removed = list.remove_least_frequent(values.len(), None);
            prop_assert_eq!(removed.len(), values.len());
            prop_assert!(list.is_empty());
            prop_assert_eq!(list.bucket_count(), 0);
        }

        /// Property: Expiry removes exactly the elements touched before the cutoff
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_outside_window_is_exact(
            steps in prop::collection::vec((0u32..10, 0u64..4), 1..60),
            window in 0u64..20,
        ) {
            let clock = ManualClock::new();
            let mut list = FrequencyList::with_clock(&clock);
            for (value, ticks) in steps {
                clock.advance(Duration::from_secs(ticks));
                list.update(value);
            }
            let window = Duration::from_secs(window);
            let cutoff = clock.earlier(window);

            let touched: HashMap<u32, Duration> = list
                .overall_least_to_most_recent()
                .unwrap()
                .map(|value| (*value, list.last_touched(value).unwrap().unwrap()))
                .collect();

            let removed = list.remove_overall_least_recent_outside(window).unwrap();
            for value in &removed {
                prop_assert!(!list.contains(value));
                prop_assert!(touched[value] < cutoff);
            }
            prop_assert_eq!(removed.len() + list.len(), touched.len());
            for value in list.overall_least_to_most_recent().unwrap() {
                prop_assert!(list.last_touched(value).unwrap().unwrap() >= cutoff);
            }
        }

        /// Property: The most recently updated value heads the recency order
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_last_update_is_most_recent(
            values in prop::collection::vec(0u32..10, 1..60)
        ) {
            let clock = ManualClock::new();
            let mut list = FrequencyList::with_clock(&clock);
            for value in &values {
                clock.advance(Duration::from_millis(1));
                list.update(*value);
                let newest = list.overall_most_to_least_recent().unwrap().next().copied();
                prop_assert_eq!(newest, Some(*value));
            }
        }
    }
}
