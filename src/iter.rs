//! Lazy traversals over a [`FrequencyList`].
//!
//! Every traversal is one [`Iter`] configured with a starting record at each
//! end and the step function for each direction. Stepping never allocates and
//! costs O(1). The iterator holds a shared borrow of the list, so the list
//! cannot change underneath an open traversal.

use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use crate::clock::Clock;
use crate::ds::slot_arena::SlotId;
use crate::frequency_list::{FrequencyList, Step};

/// Borrowing iterator over the elements of a [`FrequencyList`].
///
/// Returned by [`FrequencyList::least_to_most_frequent`] and
/// [`FrequencyList::overall_least_to_most_recent`]; the "most to least"
/// forms are the same iterator reversed.
pub struct Iter<'a, T, C: Clock> {
    list: &'a FrequencyList<T, C>,
    front: Option<SlotId>,
    back: Option<SlotId>,
    remaining: usize,
    forward: Step<T, C>,
    backward: Step<T, C>,
}

impl<'a, T, C> Iter<'a, T, C>
where
    T: Eq + Hash + Clone,
    C: Clock,
{
    pub(crate) fn new(
        list: &'a FrequencyList<T, C>,
        front: Option<SlotId>,
        back: Option<SlotId>,
        forward: Step<T, C>,
        backward: Step<T, C>,
    ) -> Self {
        Self {
            list,
            front,
            back,
            remaining: list.len(),
            forward,
            backward,
        }
    }
}

impl<T, C: Clock> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            forward: self.forward,
            backward: self.backward,
        }
    }
}

impl<T, C: Clock> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("front", &self.front)
            .field("back", &self.back)
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C>
where
    T: Eq + Hash + Clone,
    C: Clock,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let value = self.list.value_at(id)?;
        self.remaining -= 1;
        self.front = (self.forward)(self.list, id);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, C> DoubleEndedIterator for Iter<'_, T, C>
where
    T: Eq + Hash + Clone,
    C: Clock,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let value = self.list.value_at(id)?;
        self.remaining -= 1;
        self.back = (self.backward)(self.list, id);
        Some(value)
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C>
where
    T: Eq + Hash + Clone,
    C: Clock,
{
}

impl<T, C> FusedIterator for Iter<'_, T, C>
where
    T: Eq + Hash + Clone,
    C: Clock,
{
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::FrequencyList;
    use crate::clock::ManualClock;

    #[test]
    fn meets_in_the_middle_from_both_ends() {
        let mut list = FrequencyList::new();
        list.update(1).update(2).update(3).update(3).update(4);
        let mut iter = list.least_to_most_frequent();

        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn empty_list_yields_nothing() {
        let list: FrequencyList<u8> = FrequencyList::new();
        assert_eq!(list.least_to_most_frequent().next(), None);
        assert_eq!(list.most_to_least_frequent().next(), None);
    }

    #[test]
    fn clone_resumes_independently() {
        let list: FrequencyList<u8> = [1, 2, 3].into_iter().collect();
        let mut iter = list.least_to_most_frequent();
        iter.next();
        let rest: Vec<_> = iter.clone().copied().collect();
        assert_eq!(rest, vec![2, 3]);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn debug_shows_cursor_state_and_unwraps_as_error_payload() {
        let mut list = FrequencyList::new();
        list.update("a").update("b");
        let mut iter = list.least_to_most_frequent();
        iter.next();
        let text = format!("{:?}", iter);
        assert!(text.starts_with("Iter"));
        assert!(text.contains("remaining: 1"));

        // Result::unwrap_err needs the Ok side to be Debug
        let err = list.overall_most_to_least_recent().unwrap_err();
        assert_eq!(err.operation(), "overall_most_to_least_recent");
        assert!(format!("{:?}", list.most_to_least_frequent()).contains("remaining: 2"));
    }

    #[test]
    fn recency_traversal_crosses_buckets() {
        let clock = ManualClock::new();
        let mut list = FrequencyList::with_clock(&clock);
        list.update("hot").update("hot").update("cold");
        clock.advance(Duration::from_secs(1));
        list.update("hot");

        let newest_first: Vec<_> = list
            .overall_most_to_least_recent()
            .unwrap()
            .copied()
            .collect();
        assert_eq!(newest_first, vec!["hot", "cold"]);
    }
}
