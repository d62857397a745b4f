//! Ring of frequency buckets ordered by access count.
//!
//! ## Architecture
//!
//! ```text
//!   buckets: SlotArena<Bucket>   (slot 0 is the count-0 sentinel)
//!
//!        ┌──────────────── higher ───────────────────────────────┐
//!        ▼                                                       │
//!   ┌─────────┐ higher ┌─────────┐ higher ┌─────────┐ higher ┌───┴─────┐
//!   │ count 0 │ ─────► │ count 1 │ ─────► │ count 2 │ ─────► │ count 5 │
//!   │sentinel │ ◄───── │ a ◄─► d │ ◄───── │    b    │ ◄───── │  c ◄─► e│
//!   └────┬────┘  lower └─────────┘  lower └─────────┘  lower └─────────┘
//!        │                                                       ▲
//!        └──────────────── lower ────────────────────────────────┘
//! ```
//!
//! Walking `higher` from the sentinel visits counts in strictly increasing
//! order and arrives back at the sentinel. Every non-sentinel bucket holds at
//! least one record; the owning list calls [`BucketChain::prune_if_empty`]
//! after each detach.
//!
//! | Operation      | Time | Notes                                     |
//! |----------------|------|-------------------------------------------|
//! | `insert_after` | O(1) | Reuses the `count + 1` neighbour if found |
//! | `unlink`       | O(1) | Splices with the stored neighbour handles |
//! | `lowest`       | O(1) | `sentinel.higher`                         |
//! | `highest`      | O(1) | `sentinel.lower`                          |

use tracing::trace;

use crate::ds::links::Ends;
use crate::ds::slot_arena::{SlotArena, SlotId};

/// Handle of the count-0 bucket that closes the ring.
pub(crate) const SENTINEL: SlotId = SlotId(0);

/// Default bucket pre-allocation for typical frequency distributions.
/// Most items cluster at low frequencies (1-32), so 32 buckets covers most cases.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

/// All records currently observed exactly `count` times.
#[derive(Debug)]
pub(crate) struct Bucket {
    pub(crate) count: u64,
    pub(crate) lower: SlotId,
    pub(crate) higher: SlotId,
    /// Intra-bucket recency: oldest member first.
    pub(crate) members: Ends,
}

impl Bucket {
    fn sentinel() -> Self {
        Self {
            count: 0,
            lower: SENTINEL,
            higher: SENTINEL,
            members: Ends::default(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct BucketChain {
    buckets: SlotArena<Bucket>,
}

impl BucketChain {
    pub(crate) fn with_capacity(bucket_hint: usize) -> Self {
        Self {
            buckets: SlotArena::with_reserved(Bucket::sentinel(), bucket_hint.saturating_add(1)),
        }
    }

    /// Number of live buckets, not counting the sentinel.
    pub(crate) fn len(&self) -> usize {
        self.buckets.len() - 1
    }

    #[inline]
    pub(crate) fn get(&self, id: SlotId) -> Option<&Bucket> {
        self.buckets.get(id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut Bucket> {
        self.buckets.get_mut(id)
    }

    /// The bucket with the smallest count, if any.
    pub(crate) fn lowest(&self) -> Option<SlotId> {
        self.next_higher(SENTINEL)
    }

    /// The bucket with the largest count, if any.
    pub(crate) fn highest(&self) -> Option<SlotId> {
        self.next_lower(SENTINEL)
    }

    /// The neighbour with the next larger count; `None` past the top.
    #[inline]
    pub(crate) fn next_higher(&self, id: SlotId) -> Option<SlotId> {
        let higher = self.buckets.get(id)?.higher;
        (higher != SENTINEL).then_some(higher)
    }

    /// The neighbour with the next smaller count; `None` below the bottom.
    #[inline]
    pub(crate) fn next_lower(&self, id: SlotId) -> Option<SlotId> {
        let lower = self.buckets.get(id)?.lower;
        (lower != SENTINEL).then_some(lower)
    }

    /// Returns the bucket for `count(id) + 1`, splicing a new one in after
    /// `id` when its higher neighbour has a different count.
    ///
    /// Returns `None` for a stale handle or when the count would overflow.
    pub(crate) fn insert_after(&mut self, id: SlotId) -> Option<SlotId> {
        let (count, higher) = {
            let bucket = self.buckets.get(id)?;
            (bucket.count, bucket.higher)
        };
        let next_count = count.checked_add(1)?;
        if higher != SENTINEL && self.buckets.get(higher)?.count == next_count {
            return Some(higher);
        }

        let new_id = self.buckets.insert(Bucket {
            count: next_count,
            lower: id,
            higher,
            members: Ends::default(),
        });
        self.buckets.get_mut(id)?.higher = new_id;
        self.buckets.get_mut(higher)?.lower = new_id;
        trace!(count = next_count, buckets = self.len(), "frequency bucket created");
        Some(new_id)
    }

    /// Splices `id` out of the ring and frees it. The sentinel is never removed.
    pub(crate) fn unlink(&mut self, id: SlotId) -> Option<Bucket> {
        if id == SENTINEL {
            return None;
        }
        let bucket = self.buckets.remove(id)?;
        if let Some(lower) = self.buckets.get_mut(bucket.lower) {
            lower.higher = bucket.higher;
        }
        if let Some(higher) = self.buckets.get_mut(bucket.higher) {
            higher.lower = bucket.lower;
        }
        trace!(count = bucket.count, buckets = self.len(), "frequency bucket pruned");
        Some(bucket)
    }

    /// Unlinks `id` if it has no members left. Returns `true` if it was pruned.
    pub(crate) fn prune_if_empty(&mut self, id: SlotId) -> bool {
        let empty = id != SENTINEL
            && self
                .buckets
                .get(id)
                .is_some_and(|bucket| bucket.members.is_empty());
        empty && self.unlink(id).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.truncate(1);
        if let Some(sentinel) = self.buckets.get_mut(SENTINEL) {
            *sentinel = Bucket::sentinel();
        }
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.buckets.shrink_to_fit();
    }

    pub(crate) fn approx_bytes(&self) -> usize {
        self.buckets.approx_bytes()
    }

    /// Live buckets from the lowest count to the highest.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotId, &Bucket)> + '_ {
        let mut current = self.lowest();
        std::iter::from_fn(move || {
            let id = current?;
            let bucket = self.buckets.get(id)?;
            current = self.next_higher(id);
            Some((id, bucket))
        })
    }

    /// Number of slots in use, sentinel included. Used by invariant checks.
    pub(crate) fn slot_count(&self) -> usize {
        self.buckets.len()
    }
}
