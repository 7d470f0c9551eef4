use std::cmp::{Ord, Ordering};
use std::fmt::Debug;
use std::vec::Vec;

use crate::mediator::MediatorIndex;

/// Position inside the heap array.
/// Children of `i` live at `2i + 1` and `2i + 2`, parent at `(i - 1) / 2`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub(crate) struct HeapIndex(usize);

impl HeapIndex {
    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn new(v: usize) -> Self {
        Self(v)
    }
}

pub(crate) struct HeapEntry<TPriority> {
    outer_pos: MediatorIndex,
    priority: TPriority,
}

/// Receives everything the heap cannot decide on its own:
/// how to order entries with equal priorities and where entries ended up.
pub(crate) trait HeapObserver {
    /// Returns `true` if the entry stored in outer slot `first`
    /// must be closer to the root than the one in `second`.
    /// Only asked when both priorities are equal.
    fn breaks_tie(&self, first: MediatorIndex, second: MediatorIndex) -> bool;

    /// Entry stored in outer slot `outer_pos` now sits at `position`.
    fn moved(&mut self, outer_pos: MediatorIndex, position: HeapIndex);
}

pub(crate) struct BinaryHeap<TPriority>
where
    TPriority: Ord,
{
    data: Vec<HeapEntry<TPriority>>,
}

impl<TPriority: Ord> BinaryHeap<TPriority> {
    #[inline(always)]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Appends entry as a new leaf and sifts it up.
    /// Time complexity - O(log n) swaps and observer calls
    #[inline(always)]
    pub(crate) fn push<TObserver: HeapObserver>(
        &mut self,
        outer_pos: MediatorIndex,
        priority: TPriority,
        observer: &mut TObserver,
    ) {
        self.data.push(HeapEntry {
            outer_pos,
            priority,
        });
        let settled = self.sift_up(self.data.len() - 1, observer);
        observer.moved(self.data[settled].outer_pos, HeapIndex(settled));
    }

    /// Removes item with the biggest priority
    #[inline(always)]
    pub(crate) fn pop<TObserver: HeapObserver>(
        &mut self,
        observer: &mut TObserver,
    ) -> Option<(MediatorIndex, TPriority)> {
        self.remove(HeapIndex(0), observer)
    }

    #[inline(always)]
    pub(crate) fn peek(&self) -> Option<(MediatorIndex, &TPriority)> {
        self.look_into(HeapIndex(0))
    }

    /// Removes item at position and returns it.
    /// The entry that takes its place gets fixed in both directions.
    /// Time complexity - O(log n) swaps and observer calls
    pub(crate) fn remove<TObserver: HeapObserver>(
        &mut self,
        position: HeapIndex,
        observer: &mut TObserver,
    ) -> Option<(MediatorIndex, TPriority)> {
        if position >= self.len() {
            return None;
        }
        let last = self.data.len() - 1;
        if position.0 != last {
            self.swap_items(position.0, last);
        }
        let removed = self.data.pop()?;
        if position.0 < self.data.len() {
            self.fix(position, observer);
        }
        Some((removed.outer_pos, removed.priority))
    }

    #[inline(always)]
    pub(crate) fn look_into(&self, position: HeapIndex) -> Option<(MediatorIndex, &TPriority)> {
        let entry = self.data.get(position.0)?;
        Some((entry.outer_pos, &entry.priority))
    }

    /// Replaces priority of queue item and restores heap order.
    /// Returns old priority.
    pub(crate) fn change_priority<TObserver: HeapObserver>(
        &mut self,
        position: HeapIndex,
        updated: TPriority,
        observer: &mut TObserver,
    ) -> TPriority {
        assert!(
            position < self.len(),
            "Out of index during changing priority"
        );

        let old = std::mem::replace(&mut self.data[position.0].priority, updated);
        self.fix(position, observer);
        old
    }

    /// Restores heap order around entry with possibly stale priority.
    /// Tries to move it up first and moves it down only if it stayed.
    pub(crate) fn fix<TObserver: HeapObserver>(
        &mut self,
        position: HeapIndex,
        observer: &mut TObserver,
    ) {
        debug_assert!(position < self.len(), "Out of index in fix");
        let mut settled = self.sift_up(position.0, observer);
        if settled == position.0 {
            settled = self.sift_down(settled, observer);
        }
        observer.moved(self.data[settled].outer_pos, HeapIndex(settled));
    }

    /// Changes outer slot of element and returns old one
    pub(crate) fn change_outer_pos(
        &mut self,
        outer_pos: MediatorIndex,
        position: HeapIndex,
    ) -> MediatorIndex {
        assert!(position < self.len(), "Out of index during changing key");

        std::mem::replace(&mut self.data[position.0].outer_pos, outer_pos)
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> HeapIndex {
        HeapIndex(self.data.len())
    }

    #[inline(always)]
    pub(crate) fn usize_len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub(crate) fn clear(&mut self) {
        self.data.clear()
    }

    /// Entries in array order, which is not the pop order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (MediatorIndex, &TPriority)> {
        self.data.iter().map(|x| (x.outer_pos, &x.priority))
    }

    // Entry at `first` must be above entry at `second`
    #[inline(always)]
    fn precedes<TObserver: HeapObserver>(
        &self,
        first: usize,
        second: usize,
        observer: &TObserver,
    ) -> bool {
        let (first, second) = (&self.data[first], &self.data[second]);
        match first.priority.cmp(&second.priority) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => observer.breaks_tie(first.outer_pos, second.outer_pos),
        }
    }

    // Reports every entry pushed down by a swap, but not the sifted one itself.
    // Returns final position of the sifted entry.
    fn sift_up<TObserver: HeapObserver>(
        &mut self,
        mut position: usize,
        observer: &mut TObserver,
    ) -> usize {
        debug_assert!(position < self.data.len(), "Out of index in sift_up");
        while position > 0 {
            let parent_pos = (position - 1) / 2;
            if !self.precedes(position, parent_pos, observer) {
                break;
            }
            self.swap_items(parent_pos, position);
            observer.moved(self.data[position].outer_pos, HeapIndex(position));
            position = parent_pos;
        }
        position
    }

    fn sift_down<TObserver: HeapObserver>(
        &mut self,
        mut position: usize,
        observer: &mut TObserver,
    ) -> usize {
        debug_assert!(position < self.data.len(), "Out of index in sift_down");
        loop {
            let best_child = {
                let child1 = position * 2 + 1;
                let child2 = child1 + 1;
                if child1 >= self.data.len() {
                    break;
                }
                if child2 < self.data.len() && self.precedes(child2, child1, observer) {
                    child2
                } else {
                    child1
                }
            };

            if !self.precedes(best_child, position, observer) {
                break;
            }
            self.swap_items(position, best_child);
            observer.moved(self.data[position].outer_pos, HeapIndex(position));
            position = best_child;
        }
        position
    }

    #[inline(always)]
    fn swap_items(&mut self, pos1: usize, pos2: usize) {
        debug_assert!(pos1 < self.data.len(), "Out of index in first pos in swap");
        debug_assert!(pos2 < self.data.len(), "Out of index in second pos in swap");
        self.data.swap(pos1, pos2);
    }
}

impl<TPriority: Debug> Debug for HeapEntry<TPriority> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{{outer_pos: {:?}, priority: {:?}}}",
            &self.outer_pos, &self.priority
        )
    }
}

impl<TPriority: Debug + Ord> Debug for BinaryHeap<TPriority> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.data.fmt(f)
    }
}
