//! A keyed priority queue with both extrema accessible in `O(log n)`.
//!
//! An `IndexedPriorityQueue` stores values addressable by key and ordered by
//! a `u64` score that is captured once at insertion and never re-read.
//! Internally it pairs a key-to-value map with two [`ScoreHeap`]s over the
//! same keys, one per orientation, so peeking either extremum is `O(1)` and
//! popping either extremum, as well as removing an arbitrary key, is
//! `O(log n)`.
//!
//! The queue is not thread-safe; callers serialize access.

use std::collections::HashMap;
use std::hash::Hash;

use crate::score_heap::{Orientation, ScoreHeap};

/// A priority queue addressable by key, ordered by a `u64` score captured at
/// insertion, with both the minimum and the maximum reachable in `O(log n)`.
#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<K, V>
where
    K: Copy + Eq + Hash,
{
    values: HashMap<K, V>,
    min: ScoreHeap<K>,
    max: ScoreHeap<K>,
}

impl<K, V> IndexedPriorityQueue<K, V>
where
    K: Copy + Eq + Hash,
{
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty queue with pre-allocated room for `capacity`
    /// entries.
    pub fn with_capacity(capacity: usize) -> Self {
        IndexedPriorityQueue {
            values: HashMap::with_capacity(capacity),
            min: ScoreHeap::with_capacity(Orientation::Min, capacity),
            max: ScoreHeap::with_capacity(Orientation::Max, capacity),
        }
    }

    /// Returns the number of entries in the queue.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns whether `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    /// Returns a reference to the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    /// Inserts `value` under `key` with the given `score`.
    ///
    /// `key` must not already be present; the caller guarantees uniqueness.
    pub fn insert(&mut self, key: K, score: u64, value: V) {
        debug_assert!(
            !self.contains(&key),
            "key already present in IndexedPriorityQueue"
        );

        self.min.push(key, score);
        self.max.push(key, score);
        self.values.insert(key, value);
    }

    /// Removes and returns the value stored under `key`. Absent keys are a
    /// no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.values.remove(key)?;
        self.min.remove(key);
        self.max.remove(key);
        Some(value)
    }

    /// Returns the value with the smallest score without removing it.
    pub fn peek_min(&self) -> Option<&V> {
        let (key, _) = self.min.peek()?;
        self.values.get(&key)
    }

    /// Returns the value with the largest score without removing it.
    pub fn peek_max(&self) -> Option<&V> {
        let (key, _) = self.max.peek()?;
        self.values.get(&key)
    }

    /// Removes and returns the value with the smallest score.
    pub fn pop_min(&mut self) -> Option<V> {
        let (key, _) = self.min.pop()?;
        self.max.remove(&key);
        self.values.remove(&key)
    }

    /// Removes and returns the value with the largest score.
    pub fn pop_max(&mut self) -> Option<V> {
        let (key, _) = self.max.pop()?;
        self.min.remove(&key);
        self.values.remove(&key)
    }

    /// Removes every entry whose score is strictly below `threshold` and
    /// returns the values in non-decreasing score order.
    pub fn pop_below(&mut self, threshold: u64) -> Vec<V> {
        let popped = self.min.pop_below(threshold);
        let mut values = Vec::with_capacity(popped.len());
        for (key, _) in popped {
            self.max.remove(&key);
            if let Some(value) = self.values.remove(&key) {
                values.push(value);
            }
        }
        values
    }
}

impl<K, V> Default for IndexedPriorityQueue<K, V>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
