//! Expiry Registry Module
//!
//! Tracks the pending TTL timer guarding each key.

use std::collections::HashMap;

use tracing::trace;

use crate::timer::CancelHandle;

#[derive(Debug)]
struct Registration {
    generation: u64,
    handle: CancelHandle,
}

// == Expiry Registry ==
/// Maps each key to its live expiry timer.
///
/// A key holds at most one registration. Every registration carries a
/// generation number so a timer that already fired can tell whether it still
/// guards the entry it was created for.
///
/// Dropping the registry cancels every pending timer.
#[derive(Debug, Default)]
pub struct ExpiryRegistry {
    timers: HashMap<String, Registration>,
    last_generation: u64,
}

impl ExpiryRegistry {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Generation ==
    /// Allocates a generation number for a timer about to be scheduled.
    pub fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    // == Register ==
    /// Records the timer guarding `key`, cancelling any timer it replaces.
    pub fn register(&mut self, key: String, generation: u64, handle: CancelHandle) {
        let registration = Registration { generation, handle };
        if let Some(previous) = self.timers.insert(key, registration) {
            previous.handle.cancel();
        }
    }

    // == Cancel ==
    /// Cancels and forgets the timer for `key`.
    ///
    /// Returns true if the key had a registration.
    pub fn cancel(&mut self, key: &str) -> bool {
        match self.timers.remove(key) {
            Some(registration) => {
                let prevented = registration.handle.cancel();
                trace!(key, prevented, "Expiry timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancels every pending timer and returns how many were registered.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        for (_, registration) in self.timers.drain() {
            registration.handle.cancel();
        }
        count
    }

    // == Is Current ==
    /// Returns true if `generation` is the live registration for `key`.
    pub fn is_current(&self, key: &str, generation: u64) -> bool {
        self.timers
            .get(key)
            .is_some_and(|registration| registration.generation == generation)
    }

    /// Returns true if `key` has a registered timer.
    pub fn contains(&self, key: &str) -> bool {
        self.timers.contains_key(key)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Drop for ExpiryRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Scheduler, TokioScheduler};
    use std::time::Duration;

    fn far_timer() -> CancelHandle {
        TokioScheduler::new()
            .run_once_after(|| {}, Duration::from_secs(3600))
            .unwrap()
    }

    #[test]
    fn test_generations_increase() {
        let mut registry = ExpiryRegistry::new();
        let first = registry.next_generation();
        let second = registry.next_generation();
        assert!(second > first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_and_cancel() {
        let mut registry = ExpiryRegistry::new();
        let handle = far_timer();
        let generation = registry.next_generation();

        registry.register("key1".to_string(), generation, handle.clone());
        assert!(registry.contains("key1"));
        assert!(registry.is_current("key1", generation));
        assert_eq!(registry.len(), 1);

        assert!(registry.cancel("key1"));
        assert!(!handle.is_pending());
        assert!(registry.is_empty());

        // Already gone
        assert!(!registry.cancel("key1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_replaces_previous_timer() {
        let mut registry = ExpiryRegistry::new();

        let old = far_timer();
        let old_generation = registry.next_generation();
        registry.register("key1".to_string(), old_generation, old.clone());

        let new = far_timer();
        let new_generation = registry.next_generation();
        registry.register("key1".to_string(), new_generation, new.clone());

        assert!(!old.is_pending(), "replaced timer must be cancelled");
        assert!(new.is_pending());
        assert!(!registry.is_current("key1", old_generation));
        assert!(registry.is_current("key1", new_generation));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_and_drop() {
        let mut registry = ExpiryRegistry::new();
        let a = far_timer();
        let b = far_timer();

        let generation = registry.next_generation();
        registry.register("a".to_string(), generation, a.clone());
        let generation = registry.next_generation();
        registry.register("b".to_string(), generation, b.clone());

        assert_eq!(registry.cancel_all(), 2);
        assert!(!a.is_pending());
        assert!(!b.is_pending());

        let c = far_timer();
        let generation = registry.next_generation();
        registry.register("c".to_string(), generation, c.clone());
        drop(registry);
        assert!(!c.is_pending());
    }

    #[test]
    fn test_is_current_unknown_key() {
        let registry = ExpiryRegistry::new();
        assert!(!registry.is_current("missing", 1));
    }
}
