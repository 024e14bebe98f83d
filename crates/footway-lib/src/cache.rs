//! Bounded, recency-ordered store of rendered segments
//!
//! Backed by [`lru::LruCache`] in unbounded mode so that eviction can run in
//! batches: once an insert pushes the cache over capacity, least recently
//! used entries are dropped until only `eviction_fraction × capacity` remain.
//! A burst of inserts while panning quickly then pays for one eviction sweep
//! instead of one eviction per insert.

use crate::{FootwayError, Result};
use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// LRU cache with batch eviction down to a low-water mark
pub struct SegmentCache<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    capacity: usize,
    low_water: usize,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<K: Hash + Eq, V> SegmentCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// `eviction_fraction` must lie in `(0, 1]`; it sets how far an eviction
    /// sweep shrinks the cache, as a fraction of `capacity`.
    pub fn new(capacity: NonZeroUsize, eviction_fraction: f64) -> Result<Self> {
        if !(eviction_fraction > 0.0 && eviction_fraction <= 1.0) {
            return Err(FootwayError::InvalidConfig(format!(
                "eviction fraction must be in (0, 1], got {eviction_fraction}"
            )));
        }
        let capacity = capacity.get();
        // Never sweep away the entry that triggered the eviction
        let low_water = ((capacity as f64 * eviction_fraction).floor() as usize).max(1);
        Ok(Self {
            entries: LruCache::unbounded(),
            capacity,
            low_water,
        })
    }

    /// Whether `key` is cached. Does not touch recency.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    /// Look up `key` and mark it most recently used
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Mutable lookup that marks `key` most recently used
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Look up `key` without changing its recency
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.peek(key)
    }

    /// Insert `value` as the most recently used entry.
    ///
    /// `on_remove` receives every payload leaving the cache because of this
    /// call: a value replaced under the same key, then any evicted entries,
    /// least recently used first. Returns the number of evicted entries.
    pub fn insert<F>(&mut self, key: K, value: V, mut on_remove: F) -> usize
    where
        K: Clone,
        F: FnMut(K, V),
    {
        if let Some(old) = self.entries.put(key.clone(), value) {
            on_remove(key, old);
        }

        if self.entries.len() <= self.capacity {
            return 0;
        }

        let mut evicted = 0;
        while self.entries.len() > self.low_water {
            let Some((key, value)) = self.entries.pop_lru() else {
                break;
            };
            on_remove(key, value);
            evicted += 1;
        }
        tracing::debug!(
            evicted,
            remaining = self.entries.len(),
            capacity = self.capacity,
            "Segment cache over capacity, evicted least recently used entries"
        );
        evicted
    }

    /// Remove every entry, handing each payload to `on_remove`
    pub fn clear<F: FnMut(K, V)>(&mut self, mut on_remove: F) {
        while let Some((key, value)) = self.entries.pop_lru() {
            on_remove(key, value);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size the cache shrinks to once it overflows
    #[inline]
    pub fn low_water(&self) -> usize {
        self.low_water
    }

    /// Entries from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }
}
