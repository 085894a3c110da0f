//! Cache behaviour through the public library API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use memory_cache::cache::{CacheOptions, MemoryCache, SetOptions};
use memory_cache::timer::{Scheduler, TokioScheduler};
use memory_cache::CacheError;
use tokio::time::sleep;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_basic_scenario() {
    let cache = MemoryCache::new(0);

    assert_ok!(cache.set("a", "A", SetOptions::new()).await);
    assert_ok!(cache.set("b", "B", SetOptions::new()).await);

    assert_eq!(cache.get("a").await.into_option(), Some("A"));
    assert_eq!(cache.get("b").await.into_option(), Some("B"));

    assert!(cache.clear("a").await);
    assert!(!cache.clear("a").await);

    let lookup = cache.get("a").await;
    assert!(!lookup.cached);
    assert_eq!(lookup.value, None);
}

#[tokio::test]
async fn test_capacity_scenario() {
    let cache = MemoryCache::with_options(CacheOptions::new(3)).unwrap();

    for key in ["a", "b", "c"] {
        assert_ok!(cache.set(key, key.to_uppercase(), SetOptions::new()).await);
    }
    for key in ["a", "b", "a", "b", "c", "a", "c"] {
        assert!(cache.get(key).await.cached);
    }

    assert_ok!(cache.set("d", "D".to_string(), SetOptions::new()).await);
    assert!(!cache.contains("b").await);
    for key in ["a", "c", "d"] {
        assert!(cache.contains(key).await);
    }

    // c, d, a from least to most recent
    for key in ["c", "d", "a"] {
        assert!(cache.get(key).await.cached);
    }

    assert_ok!(cache.set("b", "B".to_string(), SetOptions::new()).await);
    assert_ok!(cache.set("e", "E".to_string(), SetOptions::new()).await);

    assert!(!cache.contains("c").await);
    assert!(!cache.contains("d").await);
    for key in ["a", "b", "e"] {
        assert!(cache.contains(key).await);
    }
    assert_eq!(cache.len().await, 3);
}

#[tokio::test(start_paused = true)]
async fn test_overwrite_resets_ttl() {
    let cache = MemoryCache::new(0);

    assert_ok!(cache.set("k", 1, SetOptions::expire_after_ms(200)).await);
    sleep(Duration::from_millis(150)).await;
    assert_ok!(cache.set("k", 2, SetOptions::expire_after_ms(300)).await);

    // The first deadline (200ms) passes without effect
    sleep(Duration::from_millis(200)).await;
    assert_eq!(cache.get("k").await.into_option(), Some(2));

    // The second deadline (450ms) removes it
    sleep(Duration::from_millis(150)).await;
    assert!(!cache.get("k").await.cached);
}

#[tokio::test(start_paused = true)]
async fn test_expiry_frees_capacity_slot() {
    let cache = MemoryCache::new(2);

    assert_ok!(cache.set("temp", 0, SetOptions::expire_after(Duration::from_millis(10))).await);
    assert_ok!(cache.set("keep", 1, SetOptions::new()).await);

    sleep(Duration::from_millis(20)).await;
    assert_ok!(cache.set("new", 2, SetOptions::new()).await);

    // Expiry made room, so nothing was evicted
    assert!(cache.contains("keep").await);
    assert!(cache.contains("new").await);
    assert_eq!(cache.stats().await.evictions, 0);
}

#[tokio::test]
async fn test_invalid_arguments() {
    assert_err!(MemoryCache::<u8>::with_options(CacheOptions::new(-1)));

    let cache = MemoryCache::new(0);
    let result = cache.set("k", 1u8, SetOptions::expire_after_ms(-20)).await;
    assert_eq!(
        result,
        Err(CacheError::InvalidArgument(
            "expire_after_ms must be non-negative, got -20".to_string()
        ))
    );
    assert!(cache.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_timer_scenario() {
    let scheduler = TokioScheduler::new();
    let runs = Arc::new(AtomicUsize::new(0));
    let tick = |runs: &Arc<AtomicUsize>| {
        let runs = Arc::clone(runs);
        move || {
            runs.fetch_add(1, Ordering::SeqCst);
        }
    };

    let first = assert_ok!(scheduler.run_once_after(tick(&runs), Duration::from_millis(20)));
    let second = assert_ok!(scheduler.run_once_after(tick(&runs), Duration::from_millis(40)));
    assert_ok!(scheduler.run_once_after(tick(&runs), Duration::from_millis(50)));

    sleep(Duration::from_millis(30)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(second.cancel());

    sleep(Duration::from_millis(30)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    // Cancelling after firing does nothing
    assert!(!first.cancel());
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}
