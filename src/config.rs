//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::cache::CacheOptions;
use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cached entries, 0 = unbounded
    pub max_items: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ITEMS` - Maximum cache entries (default: 0, unbounded)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    ///
    /// Unparseable values fall back to their defaults. A negative
    /// `MAX_ITEMS` is rejected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let max_items: i64 = lookup("MAX_ITEMS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.max_items as i64);
        let max_items = CacheOptions::new(max_items).capacity().map_err(|_| {
            CacheError::InvalidArgument(format!("MAX_ITEMS must be non-negative, got {}", max_items))
        })?;

        Ok(Self {
            max_items,
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.server_port),
        })
    }

    /// Options for the cache this configuration describes.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions::new(i64::try_from(self.max_items).unwrap_or(i64::MAX))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: 0,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_items, 0);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_reads_values() {
        let config =
            Config::from_lookup(lookup_from(&[("MAX_ITEMS", "500"), ("SERVER_PORT", "8080")]))
                .unwrap();
        assert_eq!(config.max_items, 500);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache_options(), CacheOptions::new(500));
    }

    #[test]
    fn test_config_unparseable_falls_back() {
        let config =
            Config::from_lookup(lookup_from(&[("MAX_ITEMS", "lots"), ("SERVER_PORT", "x")]))
                .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_negative_max_items_rejected() {
        let result = Config::from_lookup(lookup_from(&[("MAX_ITEMS", "-5")]));
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }
}
