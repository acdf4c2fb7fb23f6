//! Backend factory - turns the configured backend identifier into a live backend

use std::sync::Arc;

use tracing::info;

use crate::config::SettingsConfig;
use crate::domain::cache::{Cache, MAX_CACHE_TTL};
use crate::domain::setting::{BackendType, Setting, SettingsBackend};
use crate::domain::storage::Storage;
use crate::domain::DomainError;

use super::cache::CacheBackend;
use super::database::DatabaseBackend;

/// Factory for settings backends
#[derive(Debug)]
pub struct BackendFactory;

impl BackendFactory {
    /// Builds the backend named by `config.backend`.
    ///
    /// The cache backend needs `cache`; asking for it without one is a configuration error.
    pub fn create(
        config: &SettingsConfig,
        storage: Arc<dyn Storage<Setting>>,
        cache: Option<Arc<dyn Cache>>,
    ) -> Result<Arc<dyn SettingsBackend>, DomainError> {
        let backend_type = config.backend_type()?;
        let database =
            DatabaseBackend::new(storage).with_not_found_value(config.not_found_value.clone());

        let backend: Arc<dyn SettingsBackend> = match backend_type {
            BackendType::Database => Arc::new(database),
            BackendType::Cache => {
                let cache = cache.ok_or_else(|| {
                    DomainError::invalid_configuration(
                        "The cache backend requires a configured cache",
                    )
                })?;

                let ttl = config.cache_ttl();
                if ttl > MAX_CACHE_TTL {
                    return Err(DomainError::invalid_configuration(format!(
                        "cache_ttl_secs must be at most {}, got {}",
                        MAX_CACHE_TTL.as_secs(),
                        config.cache_ttl_secs
                    )));
                }

                Arc::new(
                    CacheBackend::new(database, cache)
                        .with_prefix(config.cache_prefix.clone())
                        .with_ttl(ttl),
                )
            }
        };

        info!(backend = %backend_type, "Settings backend selected");
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::domain::setting::{SettingName, SettingValue};
    use crate::infrastructure::storage::InMemoryStorage;

    fn config(backend: Option<&str>) -> SettingsConfig {
        SettingsConfig {
            backend: backend.map(str::to_string),
            ..Default::default()
        }
    }

    fn storage() -> Arc<dyn Storage<Setting>> {
        Arc::new(InMemoryStorage::with_entities([Setting::from_value(
            SettingName::new("mybool").unwrap(),
            SettingValue::Boolean(true),
        )]))
    }

    #[test]
    fn test_unset_backend_is_rejected() {
        let result = BackendFactory::create(&config(None), storage(), None);

        assert!(matches!(
            result,
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = BackendFactory::create(&config(Some("filesystem")), storage(), None);

        assert!(matches!(
            result,
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_database_backend() {
        let backend = BackendFactory::create(&config(Some("database")), storage(), None).unwrap();
        assert_eq!(backend.backend_type(), BackendType::Database);

        let backend = BackendFactory::create(&config(Some("DatabaseBackend")), storage(), None)
            .unwrap();
        assert_eq!(backend.backend_type(), BackendType::Database);
    }

    #[test]
    fn test_cache_backend_requires_cache() {
        let result = BackendFactory::create(&config(Some("cache")), storage(), None);

        assert!(matches!(
            result,
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[tokio::test]
    async fn test_cache_backend_uses_configured_prefix_and_ttl() {
        let cache = Arc::new(MockCache::new());
        let config = SettingsConfig {
            backend: Some("CacheBackend".to_string()),
            cache_prefix: "_mock_key_".to_string(),
            cache_ttl_secs: 5,
            ..Default::default()
        };

        let backend = BackendFactory::create(&config, storage(), Some(cache.clone())).unwrap();
        assert_eq!(backend.backend_type(), BackendType::Cache);

        assert_eq!(backend.warm_up().await.unwrap(), 1);
        let writes = cache.writes();
        assert_eq!(writes[0].0, "_mock_key_:mybool");
        assert_eq!(writes[0].2, std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_oversized_cache_ttl_is_rejected() {
        let config = SettingsConfig {
            backend: Some("cache".to_string()),
            cache_ttl_secs: u64::MAX,
            ..Default::default()
        };

        let result = BackendFactory::create(&config, storage(), Some(Arc::new(MockCache::new())));

        assert!(matches!(
            result,
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[tokio::test]
    async fn test_not_found_value_is_applied() {
        let config = SettingsConfig {
            backend: Some("db".to_string()),
            not_found_value: Some(SettingValue::Integer(0)),
            ..Default::default()
        };

        let backend = BackendFactory::create(&config, storage(), None).unwrap();

        assert_eq!(
            backend.get("missing").await.unwrap(),
            Some(SettingValue::Integer(0))
        );
    }
}
