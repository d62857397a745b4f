//! Doubly linked sublists threaded through records in a [`SlotArena`].
//!
//! A record can sit in several lists at once (its frequency bucket and the
//! overall recency chain), each through its own [`Links`] pair. The
//! [`LinkField`] selector tells the helpers which pair to rewrite, so the same
//! splice code serves both lists.
//!
//! ```text
//!   Ends { oldest, newest }
//!      │                                   │
//!      ▼                                   ▼
//!   [id_3] ◄──older/newer──► [id_7] ◄──► [id_1]
//!   least recent                         most recent
//! ```

use crate::ds::slot_arena::{SlotArena, SlotId};

/// Neighbour handles of one record inside one list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Links {
    pub(crate) older: Option<SlotId>,
    pub(crate) newer: Option<SlotId>,
}

/// The two boundary records of a list; both `None` when the list is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Ends {
    pub(crate) oldest: Option<SlotId>,
    pub(crate) newest: Option<SlotId>,
}

impl Ends {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.oldest.is_none()
    }
}

/// Selects which [`Links`] pair of a record a list operation works on.
pub(crate) trait LinkField<R> {
    fn links(record: &R) -> &Links;
    fn links_mut(record: &mut R) -> &mut Links;
}

/// Appends `id` at the newest end of the list described by `ends`.
///
/// `id` must not currently be linked into that list.
pub(crate) fn push_newest<R, F>(arena: &mut SlotArena<R>, ends: &mut Ends, id: SlotId) -> Option<()>
where
    F: LinkField<R>,
{
    let old_newest = ends.newest;
    *F::links_mut(arena.get_mut(id)?) = Links {
        older: old_newest,
        newer: None,
    };
    match old_newest {
        Some(prev) => F::links_mut(arena.get_mut(prev)?).newer = Some(id),
        None => ends.oldest = Some(id),
    }
    ends.newest = Some(id);
    Some(())
}

/// Detaches `id` from the list described by `ends` and clears its links.
pub(crate) fn unlink<R, F>(arena: &mut SlotArena<R>, ends: &mut Ends, id: SlotId) -> Option<()>
where
    F: LinkField<R>,
{
    let Links { older, newer } = *F::links(arena.get(id)?);
    match older {
        Some(prev) => F::links_mut(arena.get_mut(prev)?).newer = newer,
        None => ends.oldest = newer,
    }
    match newer {
        Some(next) => F::links_mut(arena.get_mut(next)?).older = older,
        None => ends.newest = older,
    }
    *F::links_mut(arena.get_mut(id)?) = Links::default();
    Some(())
}

/// Counts the records reachable from `ends.oldest`, checking link symmetry.
///
/// Returns `None` if a link points at a freed slot or a back link disagrees.
pub(crate) fn checked_len<R, F>(arena: &SlotArena<R>, ends: &Ends) -> Option<usize>
where
    F: LinkField<R>,
{
    let mut count = 0usize;
    let mut last = None;
    let mut current = ends.oldest;
    while let Some(id) = current {
        let links = F::links(arena.get(id)?);
        if links.older != last {
            return None;
        }
        last = Some(id);
        current = links.newer;
        count += 1;
        if count > arena.len() {
            return None;
        }
    }
    (ends.newest == last).then_some(count)
}
