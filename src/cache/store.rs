//! Cache Store Module
//!
//! Synchronous cache engine combining the recency list, the key index and the
//! expiry registry.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::cache::{CacheStats, ExpiryRegistry, Lookup, NodeRef, RecencyList};
use crate::error::{CacheError, Result};
use crate::timer::CancelHandle;

// == LRU Store ==
/// LRU store with per-key expiry timers.
///
/// The list, the index and the registry only ever change together: every
/// removal (explicit clear, eviction, expiry, overwrite) goes through
/// `detach`.
#[derive(Debug)]
pub struct LruStore<V> {
    /// Entries ordered by recency
    list: RecencyList<V>,
    /// Key to list position
    index: HashMap<String, NodeRef>,
    /// Pending TTL timers
    expiry: ExpiryRegistry,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, 0 = unbounded
    max_items: usize,
}

impl<V> LruStore<V> {
    // == Constructor ==
    /// Creates an empty store holding at most `max_items` entries.
    ///
    /// A `max_items` of 0 means unbounded.
    pub fn new(max_items: usize) -> Self {
        Self {
            list: RecencyList::new(),
            index: HashMap::new(),
            expiry: ExpiryRegistry::new(),
            stats: CacheStats::new(),
            max_items,
        }
    }

    // == Set ==
    /// Stores `value` under `key` at the most-recent position.
    ///
    /// An existing entry for `key` is removed first, so its recency and its
    /// timer are reset. `expiry` carries the generation and handle of an
    /// already scheduled TTL timer. Entries beyond capacity are evicted
    /// least-recent first.
    ///
    /// Returns the number of evicted entries.
    pub fn set(
        &mut self,
        key: String,
        value: V,
        expiry: Option<(u64, CancelHandle)>,
    ) -> Result<usize> {
        if let Some(&node) = self.index.get(&key) {
            self.detach(node);
            debug!(key = %key, "Replacing cached entry");
        }

        let node = self.list.insert_front(key.clone(), value);
        self.index.insert(key.clone(), node);

        if let Some((generation, handle)) = expiry {
            self.expiry.register(key, generation, handle);
        }

        let evicted = self.evict_over_capacity()?;
        self.stats.set_total_entries(self.index.len());
        Ok(evicted)
    }

    // == Clear ==
    /// Removes `key` and cancels its timer.
    ///
    /// Returns false if the key was not cached.
    pub fn clear(&mut self, key: &str) -> bool {
        let Some(&node) = self.index.get(key) else {
            return false;
        };
        self.detach(node);
        self.stats.set_total_entries(self.index.len());
        true
    }

    // == Expire ==
    /// Removes `key` on behalf of the timer registered with `generation`.
    ///
    /// A timer that has been superseded (the key was overwritten, cleared or
    /// evicted after it fired) finds a different or missing generation and
    /// leaves the store alone.
    pub fn expire(&mut self, key: &str, generation: u64) -> bool {
        if !self.expiry.is_current(key, generation) {
            return false;
        }
        let Some(&node) = self.index.get(key) else {
            warn!(key, "Expiry registered for a key missing from the index");
            self.expiry.cancel(key);
            return false;
        };
        self.detach(node);
        self.stats.record_expiration();
        self.stats.set_total_entries(self.index.len());
        true
    }

    // == Clear All ==
    /// Drops every entry and cancels every timer.
    ///
    /// Returns the number of entries removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.index.len();
        self.expiry.cancel_all();
        self.index.clear();
        self.list.clear();
        self.stats.set_total_entries(0);
        removed
    }

    /// Allocates the generation for a timer about to guard a new entry.
    pub fn next_generation(&mut self) -> u64 {
        self.expiry.next_generation()
    }

    /// Returns true if `key` is cached, without touching its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Cached keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.list.keys()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    /// Number of keys with a pending TTL timer.
    pub fn pending_expirations(&self) -> usize {
        self.expiry.len()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn evict_over_capacity(&mut self) -> Result<usize> {
        let mut evicted = 0;
        while self.max_items > 0 && self.index.len() > self.max_items {
            let node = self.list.least_recent().ok_or(CacheError::Empty)?;
            let (key, _) = self.detach(node);
            self.stats.record_eviction();
            debug!(key = %key, "Evicted least recently used entry");
            evicted += 1;
        }
        Ok(evicted)
    }

    /// The single removal path for all three structures.
    fn detach(&mut self, node: NodeRef) -> (String, V) {
        let (key, value) = self.list.remove(node);
        self.index.remove(&key);
        self.expiry.cancel(&key);
        (key, value)
    }

    /// Checks that the index and the list describe the same key set.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.index.len() == self.list.len()
            && self.index.iter().all(|(key, &node)| {
                self.list
                    .get(node)
                    .is_some_and(|entry| entry.key == *key)
            })
            && (self.max_items == 0 || self.index.len() <= self.max_items)
    }
}

impl<V: Clone> LruStore<V> {
    // == Get ==
    /// Looks up `key`, marking it most recently used on a hit.
    ///
    /// TTLs are fixed at `set` time; reads never extend them.
    pub fn get(&mut self, key: &str) -> Lookup<V> {
        let Some(&node) = self.index.get(key) else {
            self.stats.record_miss();
            return Lookup::miss();
        };

        self.list.move_to_front(node);
        match self.list.get(node) {
            Some(entry) => {
                self.stats.record_hit();
                Lookup::hit(entry.value.clone())
            }
            None => {
                warn!(key, "Key index points at a vacant slot");
                self.stats.record_miss();
                Lookup::miss()
            }
        }
    }
}
