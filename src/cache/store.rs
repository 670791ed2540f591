//! Cache Store Module
//!
//! `ResponseCache` combines a HashMap of entries with a separate LRU order
//! tracker. Both are mutated together by every operation, so callers sharing
//! one instance must hold a single lock around each call.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Response Cache ==
/// Bounded key/value store with per-entry expiry and LRU eviction.
///
/// Every operation is total: a missing key and an expired key both read as
/// `None`, and nothing here returns an error.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
    stats: CacheStats,
    capacity: usize,
    default_ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    ///
    /// `default_ttl` applies to every `set` that does not pass its own TTL.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity.min(1024)),
            lru: LruTracker::new(),
            stats: CacheStats::new(capacity),
            capacity,
            default_ttl,
        }
    }

    // == Get ==
    /// Returns a clone of the live value for `key`.
    ///
    /// A hit moves the key to the most-recently-used end. An expired entry is
    /// removed on the spot and reads as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "cache entry expired on read");
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Inserts or replaces `key`, resetting its TTL and recency.
    ///
    /// When `key` is new and the cache is full, exactly one entry is evicted
    /// from the least-recently-used end first.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        self.lru.touch(key.as_str());
        self.entries.insert(key, entry);
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Drops every entry. Lifetime counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Stats ==
    /// Snapshot of the counters. `size` excludes entries that have expired
    /// but not yet been swept.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let mut stats = self.stats.clone();
        stats.size = self
            .entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count();
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn evict_oldest(&mut self) {
        if let Some(victim) = self.lru.evict_oldest() {
            if let Some(entry) = self.entries.remove(&victim) {
                if entry.is_expired() {
                    self.stats.record_expirations(1);
                } else {
                    self.stats.record_eviction();
                }
                debug!(key = %victim, age_ms = entry.age().as_millis() as u64, "evicted least recently used entry");
            }
        }
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }
}
