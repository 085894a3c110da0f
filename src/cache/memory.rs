//! Memory Cache Module
//!
//! Thread-safe cache handle wiring the LRU store to expiry timers.

use std::sync::{Arc, Weak};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheOptions, CacheStats, Lookup, LruStore, SetOptions};
use crate::error::Result;
use crate::timer::{Scheduler, TimerTask, TokioScheduler};

// == Memory Cache ==
/// In-process key/value cache with LRU eviction and per-entry TTL.
///
/// Cloning is cheap and every clone shares the same entries. The store sits
/// behind a single lock; expiry timers take the same lock before touching
/// it, and only hold a weak reference so a dropped cache is never revived.
///
/// # Example
/// ```
/// use memory_cache::cache::{MemoryCache, SetOptions};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> memory_cache::error::Result<()> {
/// let cache = MemoryCache::new(2);
/// cache.set("a", "A", SetOptions::new()).await?;
/// cache.set("b", "B", SetOptions::expire_after_ms(5_000)).await?;
///
/// let lookup = cache.get("a").await;
/// assert!(lookup.cached);
/// assert_eq!(lookup.value, Some("A"));
///
/// assert!(cache.clear("a").await);
/// assert!(!cache.get("a").await.cached);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryCache<V> {
    store: Arc<RwLock<LruStore<V>>>,
    scheduler: Arc<dyn Scheduler>,
    max_items: usize,
}

impl<V> Clone for MemoryCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            scheduler: Arc::clone(&self.scheduler),
            max_items: self.max_items,
        }
    }
}

impl<V> MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache holding at most `max_items` entries (0 = unbounded).
    pub fn new(max_items: usize) -> Self {
        Self::build(max_items, Arc::new(TokioScheduler::new()))
    }

    /// Creates a cache from validated options.
    pub fn with_options(options: CacheOptions) -> Result<Self> {
        Self::with_scheduler(options, Arc::new(TokioScheduler::new()))
    }

    /// Creates a cache whose expiry timers run on `scheduler`.
    pub fn with_scheduler(options: CacheOptions, scheduler: Arc<dyn Scheduler>) -> Result<Self> {
        let max_items = options.capacity()?;
        Ok(Self::build(max_items, scheduler))
    }

    fn build(max_items: usize, scheduler: Arc<dyn Scheduler>) -> Self {
        info!(max_items, "Memory cache created");
        Self {
            store: Arc::new(RwLock::new(LruStore::new(max_items))),
            scheduler,
            max_items,
        }
    }

    // == Get ==
    /// Looks up `key`, making it the most recently used entry on a hit.
    pub async fn get(&self, key: &str) -> Lookup<V> {
        // Write lock: a hit reorders the recency list
        self.store.write().await.get(key)
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and its TTL.
    ///
    /// The expiry timer is scheduled before the store changes, so a
    /// scheduling failure leaves the cache exactly as it was.
    pub async fn set(&self, key: impl Into<String>, value: V, options: SetOptions) -> Result<()> {
        let key = key.into();
        let ttl = options.ttl()?;

        let mut store = self.store.write().await;
        let expiry = match ttl {
            Some(ttl) => {
                let generation = store.next_generation();
                let task = self.expiry_task(key.clone(), generation);
                let handle = self.scheduler.schedule_once(task, ttl)?;
                Some((generation, handle))
            }
            None => None,
        };

        let evicted = store.set(key, value, expiry)?;
        if evicted > 0 {
            debug!(evicted, "Capacity exceeded, evicted entries");
        }
        Ok(())
    }

    // == Clear ==
    /// Removes `key`, returning whether it was cached.
    pub async fn clear(&self, key: &str) -> bool {
        self.store.write().await.clear(key)
    }

    /// Removes every entry and cancels all pending expiry timers.
    pub async fn clear_all(&self) -> usize {
        let removed = self.store.write().await.clear_all();
        info!(removed, "Cache cleared");
        removed
    }

    /// Returns true if `key` is cached, without touching its recency.
    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains(key)
    }

    // == Length ==
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Number of entries with a pending TTL timer.
    pub async fn pending_expirations(&self) -> usize {
        self.store.read().await.pending_expirations()
    }

    /// Capacity bound, 0 when unbounded.
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    fn expiry_task(&self, key: String, generation: u64) -> TimerTask {
        let store: Weak<RwLock<LruStore<V>>> = Arc::downgrade(&self.store);
        Box::pin(async move {
            let Some(store) = store.upgrade() else {
                return;
            };
            let expired = store.write().await.expire(&key, generation);
            if expired {
                debug!(key = %key, "Entry expired");
            }
        })
    }
}
