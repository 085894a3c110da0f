//! Cache Entry Module
//!
//! Defines a stored entry and the result of looking one up.

use serde::Serialize;

// == Cache Entry ==
/// A single cached key/value pair, owned by its recency list slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    /// The key the entry is indexed under
    pub key: String,
    /// The stored value
    pub value: V,
}

// == Lookup ==
/// Outcome of a cache read.
///
/// `cached` is the only presence signal. A hit may carry a value that is
/// itself null-like (`serde_json::Value::Null`, `None`), which is still a hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lookup<V> {
    /// Whether the key was present
    pub cached: bool,
    /// The stored value on a hit, `None` on a miss
    pub value: Option<V>,
}

impl<V> Lookup<V> {
    /// A hit carrying the stored value.
    pub fn hit(value: V) -> Self {
        Self {
            cached: true,
            value: Some(value),
        }
    }

    /// A miss.
    pub fn miss() -> Self {
        Self {
            cached: false,
            value: None,
        }
    }

    /// Collapses the lookup into an `Option`, `Some` exactly on a hit.
    pub fn into_option(self) -> Option<V> {
        if self.cached {
            self.value
        } else {
            None
        }
    }
}

impl<V> From<Option<V>> for Lookup<V> {
    fn from(found: Option<V>) -> Self {
        match found {
            Some(value) => Self::hit(value),
            None => Self::miss(),
        }
    }
}
