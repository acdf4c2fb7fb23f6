//! Cache backend - database backend fronted by a TTL cache

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::cache::{Cache, CacheExt, CacheKeyGenerator, PrefixKeyGenerator};
use crate::domain::setting::{
    BackendType, Setting, SettingFilter, SettingValue, SettingsBackend,
};
use crate::domain::DomainError;

use super::database::DatabaseBackend;

/// Default lifetime of a cached setting
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Reads through a cache and writes through to the database.
///
/// Every write updates the database first and then refreshes the cache entry, so a
/// subsequent `get` is served without touching storage. Absent names are never cached.
#[derive(Debug, Clone)]
pub struct CacheBackend {
    database: DatabaseBackend,
    cache: Arc<dyn Cache>,
    keys: PrefixKeyGenerator,
    ttl: Duration,
}

impl CacheBackend {
    pub fn new(database: DatabaseBackend, cache: Arc<dyn Cache>) -> Self {
        Self {
            database,
            cache,
            keys: PrefixKeyGenerator::default(),
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.keys = PrefixKeyGenerator::new(prefix);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn prefix(&self) -> &str {
        self.keys.prefix()
    }

    /// Cache key used for a setting name
    pub fn cache_key(&self, name: &str) -> String {
        self.keys.generate(name)
    }

    /// Writes a single value into the cache under the backend's prefix and TTL
    pub async fn set_in_cache(&self, name: &str, value: &SettingValue) -> Result<(), DomainError> {
        let key = self.cache_key(name);
        debug!(name, key = %key, ttl_secs = self.ttl.as_secs(), "Caching setting");
        self.cache.set(&key, value, self.ttl).await
    }

    /// Copies every stored setting into the cache, returns how many were written
    pub async fn load_all_into_cache(&self) -> Result<usize, DomainError> {
        let settings = self.database.get_all(&SettingFilter::all()).await?;
        let count = settings.len();

        for setting in &settings {
            self.set_in_cache(setting.name().as_str(), setting.value())
                .await?;
        }

        info!(count, prefix = %self.prefix(), "Loaded settings into cache");
        Ok(count)
    }
}

#[async_trait]
impl SettingsBackend for CacheBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Cache
    }

    async fn get_all(&self, filter: &SettingFilter) -> Result<Vec<Setting>, DomainError> {
        self.database.get_all(filter).await
    }

    async fn get(&self, name: &str) -> Result<Option<SettingValue>, DomainError> {
        let key = self.cache_key(name);

        let cached: Result<Option<SettingValue>, DomainError> = self.cache.get(&key).await;

        match cached {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) => {}
            // Entries this build cannot decode are treated as misses and overwritten
            Err(DomainError::UnreadableCacheEntry { message, .. }) => {
                warn!(name, error = %message, "Discarding unreadable cache entry");
            }
            Err(e) => return Err(e),
        }

        match self.database.find_setting(name).await? {
            Some(setting) => {
                let value = setting.into_value();
                self.set_in_cache(name, &value).await?;
                Ok(Some(value))
            }
            None => {
                debug!(name, "Setting not found, returning fallback value");
                Ok(self.database.not_found_value())
            }
        }
    }

    async fn set(&self, name: &str, value: SettingValue) -> Result<SettingValue, DomainError> {
        let value = self
            .database
            .set(name, value)
            .await
            .inspect_err(|e| warn!(name, error = %e, "Storage rejected setting update"))?;
        self.set_in_cache(name, &value).await?;
        Ok(value)
    }

    async fn find(&self, name: &str) -> Result<Option<Setting>, DomainError> {
        self.database.find(name).await
    }

    async fn create(&self, setting: Setting) -> Result<Setting, DomainError> {
        let setting = self.database.create(setting).await?;
        self.set_in_cache(setting.name().as_str(), setting.value())
            .await?;
        Ok(setting)
    }

    async fn delete(&self, name: &str) -> Result<bool, DomainError> {
        let deleted = self.database.delete(name).await?;
        self.cache.delete(&self.cache_key(name)).await?;
        Ok(deleted)
    }

    async fn warm_up(&self) -> Result<usize, DomainError> {
        self.load_all_into_cache().await
    }
}
