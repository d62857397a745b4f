//! Index-addressed storage for list records and frequency buckets.
//!
//! Every link in the frequency list is a [`SlotId`] into one of these arenas,
//! so relinking is plain index rewriting. Freed slots are recycled through a
//! free list; a slot can be pinned at construction with [`SlotArena::with_reserved`]
//! so that it is never handed out again (the bucket chain keeps its sentinel there).

/// Stable handle into a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotId(pub(crate) usize);

#[derive(Debug)]
pub(crate) struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Creates an arena whose slot 0 holds `reserved`.
    ///
    /// The reserved slot counts toward [`len`](Self::len) like any other
    /// value; callers that never remove it get a permanent anchor at
    /// `SlotId(0)`.
    pub(crate) fn with_reserved(reserved: T, capacity: usize) -> Self {
        let mut arena = Self::with_capacity(capacity.max(1));
        arena.insert(reserved);
        arena
    }

    pub(crate) fn insert(&mut self, value: T) -> SlotId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(value);
            idx
        } else {
            self.slots.push(Some(value));
            self.slots.len() - 1
        };
        self.len += 1;
        SlotId(idx)
    }

    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        let value = slot.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    #[inline]
    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every slot except the first `keep` ones, which must be live.
    ///
    /// `truncate(0)` empties the arena; `truncate(1)` keeps a reserved slot.
    pub(crate) fn truncate(&mut self, keep: usize) {
        self.slots.truncate(keep);
        self.free_list.clear();
        self.len = self.slots.iter().filter(|slot| slot.is_some()).count();
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.slots.shrink_to_fit();
        self.free_list.shrink_to_fit();
    }

    pub(crate) fn approx_bytes(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Option<T>>()
            + self.free_list.capacity() * std::mem::size_of::<usize>()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (SlotId(idx), value)))
    }
}
