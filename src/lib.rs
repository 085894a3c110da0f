//! Memory Cache - an in-process key/value cache
//!
//! Bounds memory by item count with LRU eviction and bounds staleness with
//! per-entry TTL timers. A small HTTP surface exposes one cache instance.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod timer;

pub use api::AppState;
pub use cache::{CacheOptions, Lookup, MemoryCache, SetOptions};
pub use config::Config;
pub use error::{CacheError, Result};
