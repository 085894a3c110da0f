//! Cache Module
//!
//! Provides an in-memory cache with LRU eviction and timer-driven TTL expiry.

mod entry;
mod expiry;
mod lru;
mod memory;
mod options;
mod stats;
mod store;


// Re-export public types
pub use entry::{Entry, Lookup};
pub use expiry::ExpiryRegistry;
pub use lru::{NodeRef, RecencyList};
pub use memory::MemoryCache;
pub use options::{CacheOptions, SetOptions};
pub use stats::CacheStats;
pub use store::LruStore;

// == Public Constants ==
/// Maximum allowed key length in bytes for keys arriving over HTTP
pub const MAX_KEY_LENGTH: usize = 256;
