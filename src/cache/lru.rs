//! LRU Tracker Module
//!
//! Keeps the recency order of cache keys, separate from the entry map.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Recency order of keys.
///
/// Front = most recently used, back = least recently used. Each key appears
/// at most once.
#[derive(Debug)]
pub struct LruTracker<K = String> {
    order: VecDeque<K>,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }
}

impl<K: PartialEq> LruTracker<K> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Moves `key` to the most-recently-used end, inserting it if untracked.
    pub fn touch<Q>(&mut self, key: &Q)
    where
        Q: ?Sized + ToOwned<Owned = K>,
        K: PartialEq<Q>,
    {
        self.remove(key);
        self.order.push_front(key.to_owned());
    }

    // == Remove ==
    /// Stops tracking `key`. No-op when absent.
    pub fn remove<Q>(&mut self, key: &Q)
    where
        Q: ?Sized,
        K: PartialEq<Q>,
    {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Evict Oldest ==
    /// Pops the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_back()
    }

    /// The key that would be evicted next.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.back()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: PartialEq<Q>,
    {
        self.order.iter().any(|k| k == key)
    }
}
