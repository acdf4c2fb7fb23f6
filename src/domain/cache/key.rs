//! Cache key generation

use std::fmt::Debug;

/// Default namespace for setting cache keys
pub const DEFAULT_KEY_PREFIX: &str = "_dyn_settings_";

/// Trait for deriving cache keys from setting names
pub trait CacheKeyGenerator: Send + Sync + Debug {
    /// Returns the cache key for the given setting name
    fn generate(&self, name: &str) -> String;
}

/// Builds `{prefix}:{name}` keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixKeyGenerator {
    prefix: String,
}

impl PrefixKeyGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for PrefixKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

impl CacheKeyGenerator for PrefixKeyGenerator {
    fn generate(&self, name: &str) -> String {
        format!("{}:{}", self.prefix, name)
    }
}
