//! Cache Options Module
//!
//! Construction-time and per-write options, validated before use.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Cache Options ==
/// Options fixed when a cache is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Maximum number of entries; 0 means unbounded. Must not be negative.
    #[serde(default)]
    pub max_items: i64,
}

impl CacheOptions {
    pub fn new(max_items: i64) -> Self {
        Self { max_items }
    }

    /// Options for a cache without a capacity bound.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Returns the capacity bound, rejecting negative values.
    pub fn capacity(&self) -> Result<usize> {
        usize::try_from(self.max_items).map_err(|_| {
            CacheError::InvalidArgument(format!(
                "max_items must be non-negative, got {}",
                self.max_items
            ))
        })
    }
}

// == Set Options ==
/// Options for a single `set`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOptions {
    /// Milliseconds until the entry expires. `None` or 0 means never.
    #[serde(default)]
    pub expire_after_ms: Option<i64>,
}

impl SetOptions {
    /// Options without expiry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire the entry `ms` milliseconds after it is set.
    pub fn expire_after_ms(ms: i64) -> Self {
        Self {
            expire_after_ms: Some(ms),
        }
    }

    /// Expire the entry `ttl` after it is set.
    pub fn expire_after(ttl: Duration) -> Self {
        Self::expire_after_ms(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX))
    }

    /// Resolves the requested TTL.
    ///
    /// Returns `Ok(None)` when no expiry applies and `InvalidArgument` for a
    /// negative duration.
    pub fn ttl(&self) -> Result<Option<Duration>> {
        match self.expire_after_ms {
            None | Some(0) => Ok(None),
            Some(ms) if ms < 0 => Err(CacheError::InvalidArgument(format!(
                "expire_after_ms must be non-negative, got {}",
                ms
            ))),
            Some(ms) => Ok(Some(Duration::from_millis(ms as u64))),
        }
    }
}
