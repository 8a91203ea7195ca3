//! # Configuration
//!
//! A string key/value store, layered by the host however it likes.
//!
//! ```rust
//! use psico_core::PsicoConfig;
//!
//! let mut config = PsicoConfig::new();
//! config.set("api.timeout_secs", "30");
//! assert_eq!(config.get_u64("api.timeout_secs"), Some(30));
//! ```
//!
//! ## Environment overrides
//!
//! `load_env("PSICO__")` maps `PSICO__API__URL=https://x/api` to `api.url`.
//! `load_dotenv` reads a `.env` file first (missing file is not an error),
//! so build-time style overrides work the same way in development.

use std::collections::HashMap;
use std::path::Path;

/// Conventional environment prefix.
pub const ENV_PREFIX: &str = "PSICO__";

#[derive(Debug, Default, Clone)]
pub struct PsicoConfig {
    values: HashMap<String, String>,
}

impl PsicoConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Environment layered on top of an optional `.env` file.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.load_dotenv(None);
        config.load_env(ENV_PREFIX);
        config
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Value with surrounding whitespace removed; empty counts as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.trim().parse::<u16>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }

    /// Import `PREFIX` variables from a list of pairs
    /// (`PREFIX__A__B` → `a.b`). Returns how many keys were set.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut n = 0;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.set(normalized, value);
                n += 1;
            }
        }
        n
    }

    pub fn load_env(&mut self, prefix: &str) -> usize {
        self.load_vars(prefix, std::env::vars())
    }

    /// Load a dotenv file into the process environment. `None` searches
    /// for `.env` from the working directory up.
    pub fn load_dotenv(&mut self, path: Option<&Path>) -> bool {
        let loaded = match path {
            Some(p) => dotenvy::from_path(p).is_ok(),
            None => dotenvy::dotenv().is_ok(),
        };
        if loaded {
            tracing::debug!("loaded .env file");
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_vars_become_dotted_keys() {
        let mut config = PsicoConfig::new();
        let n = config.load_vars(
            ENV_PREFIX,
            vec![
                ("PSICO__API__URL".to_string(), "https://x/api".to_string()),
                ("HOME".to_string(), "/root".to_string()),
            ],
        );
        assert_eq!(n, 1);
        assert_eq!(config.get("api.url"), Some("https://x/api"));
        assert!(!config.has("home"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let mut config = PsicoConfig::new();
        config.set("api.url", "   ");
        assert!(config.has("api.url"));
        assert_eq!(config.get_non_empty("api.url"), None);
        config.set("api.local_port", "x");
        assert_eq!(config.get_u16("api.local_port"), None);
    }
}
