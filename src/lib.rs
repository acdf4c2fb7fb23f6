//! Dynamic settings store
//!
//! Typed, named configuration values that can be changed at runtime without a
//! redeploy:
//! - Six value kinds (boolean, integer, float, string, list, mapping) with text coercion
//! - A database backend reading straight from durable storage
//! - A cache-fronted backend that writes through and keeps its cache coherent
//! - In-memory and PostgreSQL storage, in-memory (moka) and Redis caches

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;
pub use crate::domain::{DomainError, Settings, SettingKind, SettingValue};

use std::sync::Arc;

use domain::setting::{BackendType, Setting};
use domain::storage::Storage;
use infrastructure::backend::BackendFactory;
use infrastructure::cache::CacheFactory;
use infrastructure::storage::StorageFactory;
use tracing::info;

/// Builds the settings facade described by `config`
pub async fn create_settings(config: &AppConfig) -> anyhow::Result<Settings> {
    info!(storage = %config.storage.backend, "Opening settings storage");
    let storage = StorageFactory::create::<Setting>(&config.storage).await?;

    create_settings_with_storage(config, storage).await
}

/// Builds the settings facade over an already opened storage
pub async fn create_settings_with_storage(
    config: &AppConfig,
    storage: Arc<dyn Storage<Setting>>,
) -> anyhow::Result<Settings> {
    let backend_type = config.settings.backend_type()?;

    let cache = match backend_type {
        BackendType::Cache => {
            info!(cache = %config.cache.cache_type, "Opening settings cache");
            Some(CacheFactory::new().create(&config.cache).await?)
        }
        BackendType::Database => None,
    };

    let backend = BackendFactory::create(&config.settings, storage, cache)?;

    if backend_type == BackendType::Cache && config.settings.warm_cache_on_start {
        let count = backend.warm_up().await?;
        info!(count, "Settings cache warmed");
    }

    Ok(Settings::new(backend).with_filter(config.settings.filter()))
}
