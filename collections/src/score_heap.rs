//! A binary heap over unsigned 64-bit scores with a key-to-slot index.
//!
//! A `ScoreHeap` stores `(key, score)` pairs in a dense array obeying the
//! usual heap shape, and additionally maintains a `HashMap` from key to the
//! key's current array slot. The map is updated on every swap, so membership
//! tests are `O(1)` and removal of an arbitrary key is `O(log n)` instead of
//! the `O(n)` scan a plain binary heap would need.
//!
//! Whether the smallest or the largest score sits at the root is decided by
//! the [`Orientation`] passed at construction and cannot change afterwards.
//!
//! Keys must be unique: pushing a key that is already present is a logic
//! error (checked in debug builds only). When two entries carry equal
//! scores, their relative order is unspecified and callers must not depend
//! on it.

use std::collections::HashMap;
use std::hash::Hash;

/// Heap ordering: whether the smallest or the largest score is at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The root holds the smallest score.
    Min,
    /// The root holds the largest score.
    Max,
}

#[derive(Debug, Clone)]
struct Slot<K> {
    key: K,
    score: u64,
}

/// A binary heap over `u64` scores, augmented with a key-to-slot map for
/// `O(1)` membership tests and `O(log n)` removal by key.
///
/// See the [module documentation](self) for the full contract.
#[derive(Debug, Clone)]
pub struct ScoreHeap<K>
where
    K: Copy + Eq + Hash,
{
    orientation: Orientation,
    slots: Vec<Slot<K>>,
    positions: HashMap<K, usize>,
}

impl<K> ScoreHeap<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates an empty heap with the given orientation.
    pub fn new(orientation: Orientation) -> Self {
        Self::with_capacity(orientation, 0)
    }

    /// Creates an empty heap with the given orientation and pre-allocated
    /// room for `capacity` entries.
    pub fn with_capacity(orientation: Orientation, capacity: usize) -> Self {
        ScoreHeap {
            orientation,
            slots: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of entries in the heap.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns whether `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// Pushes a new entry onto the heap.
    ///
    /// `key` must not already be present; the caller guarantees uniqueness.
    pub fn push(&mut self, key: K, score: u64) {
        debug_assert!(!self.contains(&key), "key already present in ScoreHeap");

        let index = self.slots.len();
        self.slots.push(Slot { key, score });
        self.positions.insert(key, index);
        self.sift_up(index);
    }

    /// Returns the root entry without removing it.
    pub fn peek(&self) -> Option<(K, u64)> {
        self.slots.first().map(|slot| (slot.key, slot.score))
    }

    /// Removes and returns the root entry.
    pub fn pop(&mut self) -> Option<(K, u64)> {
        if self.slots.is_empty() {
            return None;
        }
        let last = self.slots.len() - 1;
        self.slots.swap(0, last);
        let slot = self.slots.pop()?;
        self.positions.remove(&slot.key);
        if !self.slots.is_empty() {
            self.positions.insert(self.slots[0].key, 0);
            self.sift_down(0);
        }
        Some((slot.key, slot.score))
    }

    /// Removes the entry with `key`, restoring the heap shape around the
    /// vacated slot. Returns whether the key was present.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(index) = self.positions.remove(key) else {
            return false;
        };
        let last = self.slots.len() - 1;
        if index == last {
            self.slots.pop();
            return true;
        }
        self.slots.swap(index, last);
        self.slots.pop();
        self.positions.insert(self.slots[index].key, index);
        // The filler may belong either above or below the vacated slot.
        self.sift_down(index);
        self.sift_up(index);
        true
    }

    /// Pops root entries while their score is strictly below `threshold`
    /// and returns them in pop order.
    ///
    /// Only meaningful on a min-oriented heap, where pop order is
    /// non-decreasing score order.
    pub fn pop_below(&mut self, threshold: u64) -> Vec<(K, u64)> {
        debug_assert_eq!(self.orientation, Orientation::Min);

        let mut popped = Vec::new();
        while let Some((_, score)) = self.peek() {
            if score >= threshold {
                break;
            }
            if let Some(entry) = self.pop() {
                popped.push(entry);
            }
        }
        popped
    }

    /// Returns whether the slot at `a` must sit above the slot at `b`.
    fn precedes(&self, a: usize, b: usize) -> bool {
        match self.orientation {
            Orientation::Min => self.slots[a].score < self.slots[b].score,
            Orientation::Max => self.slots[a].score > self.slots[b].score,
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.positions.insert(self.slots[a].key, a);
        self.positions.insert(self.slots[b].key, b);
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.precedes(index, parent) {
                break;
            }
            self.swap_slots(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut target = index;
            if left < self.slots.len() && self.precedes(left, target) {
                target = left;
            }
            if right < self.slots.len() && self.precedes(right, target) {
                target = right;
            }
            if target == index {
                break;
            }
            self.swap_slots(index, target);
            index = target;
        }
    }
}
