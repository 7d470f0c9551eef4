use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use crate::config::TieBreak;
use crate::editable_binary_heap::{BinaryHeap, HeapIndex, HeapObserver};
use crate::mediator::{Mediator, MediatorIndex};

/// Binary heap with key to position lookup.
///
/// Keys live in the mediator and are never moved by heap reordering:
/// heap entries hold only mediator slots and priorities,
/// and the mediator holds the current heap position of every key.
///
/// Knows nothing about locking or capacity.
pub(crate) struct IndexedHeap<TKey, TPriority, S>
where
    TKey: Hash + Eq,
    TPriority: Ord,
    S: BuildHasher,
{
    heap: BinaryHeap<TPriority>,
    key_to_pos: Mediator<TKey, S>,
    tie_break: TieBreak<TKey>,
}

/// Keeps mediator in sync with heap moves and resolves ties by keys.
struct Tracker<'a, TKey: Hash + Eq, S: BuildHasher> {
    key_to_pos: &'a mut Mediator<TKey, S>,
    tie_break: &'a TieBreak<TKey>,
}

impl<'a, TKey: Hash + Eq, S: BuildHasher> HeapObserver for Tracker<'a, TKey, S> {
    #[inline(always)]
    fn breaks_tie(&self, first: MediatorIndex, second: MediatorIndex) -> bool {
        let (first, _) = self.key_to_pos.get_index(first);
        let (second, _) = self.key_to_pos.get_index(second);
        self.tie_break.precedes(first, second)
    }

    #[inline(always)]
    fn moved(&mut self, outer_pos: MediatorIndex, position: HeapIndex) {
        *self.key_to_pos.get_index_mut(outer_pos) = position;
    }
}

impl<TKey, TPriority, S> IndexedHeap<TKey, TPriority, S>
where
    TKey: Hash + Eq,
    TPriority: Ord,
    S: BuildHasher,
{
    /// Memory is reserved lazily, so huge queue capacities cost nothing upfront.
    pub(crate) fn new(tie_break: TieBreak<TKey>, hasher: S) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(0),
            key_to_pos: Mediator::with_capacity_and_hasher(0, hasher),
            tie_break,
        }
    }

    /// Adds key which is not in the heap yet.
    pub(crate) fn push(&mut self, key: TKey, priority: TPriority) {
        // Borrow checker treats borrowing a field as borrowing whole structure
        // so we need to get references to fields to borrow them individually.
        let heap = &mut self.heap;
        let outer_pos = self.key_to_pos.insert_vacant(key, heap.len());
        let mut tracker = Tracker {
            key_to_pos: &mut self.key_to_pos,
            tie_break: &self.tie_break,
        };
        heap.push(outer_pos, priority, &mut tracker);
    }

    /// Removes entry with the biggest priority.
    /// Returns `None` for empty heap or if heap and lookup disagree.
    pub(crate) fn pop(&mut self) -> Option<(TKey, TPriority)> {
        let mut tracker = Tracker {
            key_to_pos: &mut self.key_to_pos,
            tie_break: &self.tie_break,
        };
        let (outer_pos, priority) = self.heap.pop(&mut tracker)?;
        let key = self.forget(outer_pos)?;
        Some((key, priority))
    }

    pub(crate) fn peek(&self) -> Option<(&TKey, &TPriority)> {
        let (outer_pos, priority) = self.heap.peek()?;
        let (key, _) = self.key_to_pos.get_index(outer_pos);
        Some((key, priority))
    }

    /// Replaces priority of queued key and restores heap order.
    /// Returns old priority.
    pub(crate) fn update(&mut self, outer_pos: MediatorIndex, priority: TPriority) -> TPriority {
        let (_, position) = self.key_to_pos.get_index(outer_pos);
        let mut tracker = Tracker {
            key_to_pos: &mut self.key_to_pos,
            tie_break: &self.tie_break,
        };
        self.heap.change_priority(position, priority, &mut tracker)
    }

    /// Removes queued key wherever it sits in the heap.
    pub(crate) fn remove(&mut self, outer_pos: MediatorIndex) -> Option<(TKey, TPriority)> {
        let (_, position) = self.key_to_pos.get_index(outer_pos);
        let mut tracker = Tracker {
            key_to_pos: &mut self.key_to_pos,
            tie_break: &self.tie_break,
        };
        let (removed, priority) = self.heap.remove(position, &mut tracker)?;
        debug_assert_eq!(removed, outer_pos);
        let key = self.forget(removed)?;
        Some((key, priority))
    }

    pub(crate) fn slot_of<Q>(&self, key: &Q) -> Option<MediatorIndex>
    where
        TKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (outer_pos, _, _) = self.key_to_pos.get_full(key)?;
        Some(outer_pos)
    }

    pub(crate) fn get_priority(&self, outer_pos: MediatorIndex) -> &TPriority {
        let (_, position) = self.key_to_pos.get_index(outer_pos);
        let (stored, priority) = self
            .heap
            .look_into(position)
            .expect("Mediator must point into heap");
        debug_assert_eq!(stored, outer_pos);
        priority
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        debug_assert_eq!(self.key_to_pos.len(), self.heap.usize_len());
        self.key_to_pos.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        debug_assert_eq!(self.heap.is_empty(), self.key_to_pos.is_empty());
        self.heap.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.key_to_pos.clear();
    }

    /// Entries in heap array order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&TKey, &TPriority)> {
        self.heap.iter().map(move |(outer_pos, priority)| {
            let (key, _) = self.key_to_pos.get_index(outer_pos);
            (key, priority)
        })
    }

    // Drops key of entry already taken out of the heap.
    // Mediator fills the hole with its last slot, so heap entry of that slot must follow.
    fn forget(&mut self, outer_pos: MediatorIndex) -> Option<TKey> {
        let (key, _) = self.key_to_pos.swap_remove_index(outer_pos)?;
        if outer_pos.0 != self.key_to_pos.len() {
            let (_, position_of_moved) = self.key_to_pos.get_index(outer_pos);
            let old = self.heap.change_outer_pos(outer_pos, position_of_moved);
            debug_assert_eq!(old, MediatorIndex(self.key_to_pos.len()));
        }
        Some(key)
    }
}

impl<TKey, TPriority, S> Debug for IndexedHeap<TKey, TPriority, S>
where
    TKey: Hash + Eq + Debug,
    TPriority: Ord + Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_list().entries(self.iter()).finish()
    }
}
