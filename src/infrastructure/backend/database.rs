//! Database backend - settings read and written straight from durable storage

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::setting::{
    BackendType, Setting, SettingFilter, SettingName, SettingValue, SettingsBackend,
};
use crate::domain::storage::Storage;
use crate::domain::DomainError;

/// Read and conditional-write rounds `set` makes before giving up on a contended setting
const SET_ATTEMPTS: usize = 3;

/// Backend over a `Storage<Setting>`, the source of truth for every other backend
#[derive(Debug, Clone)]
pub struct DatabaseBackend {
    storage: Arc<dyn Storage<Setting>>,
    not_found_value: Option<SettingValue>,
}

impl DatabaseBackend {
    pub fn new(storage: Arc<dyn Storage<Setting>>) -> Self {
        Self {
            storage,
            not_found_value: None,
        }
    }

    /// Value returned by `get` for unknown names instead of `None`
    pub fn with_not_found_value(mut self, value: Option<SettingValue>) -> Self {
        self.not_found_value = value;
        self
    }

    pub fn not_found_value(&self) -> Option<SettingValue> {
        self.not_found_value.clone()
    }

    /// Looks a record up by name. Names that could never be stored are simply absent.
    pub async fn find_setting(&self, name: &str) -> Result<Option<Setting>, DomainError> {
        let Ok(key) = SettingName::new(name) else {
            return Ok(None);
        };

        self.storage.get(&key).await
    }
}

#[async_trait]
impl SettingsBackend for DatabaseBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Database
    }

    async fn get_all(&self, filter: &SettingFilter) -> Result<Vec<Setting>, DomainError> {
        let settings = self.storage.list().await?;

        if filter.is_unrestricted() {
            return Ok(settings);
        }

        Ok(settings.into_iter().filter(|s| filter.matches(s)).collect())
    }

    async fn get(&self, name: &str) -> Result<Option<SettingValue>, DomainError> {
        match self.find_setting(name).await? {
            Some(setting) => Ok(Some(setting.into_value())),
            None => {
                debug!(name, "Setting not found, returning fallback value");
                Ok(self.not_found_value())
            }
        }
    }

    async fn set(&self, name: &str, value: SettingValue) -> Result<SettingValue, DomainError> {
        for attempt in 1..=SET_ATTEMPTS {
            let current = self
                .find_setting(name)
                .await?
                .ok_or_else(|| DomainError::setting_does_not_exist(name))?;

            let mut updated = current.clone();
            updated.set_value(value.clone())?;

            match self.storage.compare_and_swap(&current, updated).await {
                Ok(_) => return Ok(value),
                // Removed between the read and the conditional update
                Err(DomainError::NotFound { .. }) => {
                    return Err(DomainError::setting_does_not_exist(name));
                }
                // Changed or recreated since the read; re-check against the new record
                Err(DomainError::Conflict { .. }) => {
                    debug!(name, attempt, "Setting changed during update, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::conflict(format!(
            "Setting '{}' kept changing during update",
            name
        )))
    }

    async fn find(&self, name: &str) -> Result<Option<Setting>, DomainError> {
        self.find_setting(name).await
    }

    async fn create(&self, setting: Setting) -> Result<Setting, DomainError> {
        self.storage.create(setting).await
    }

    async fn delete(&self, name: &str) -> Result<bool, DomainError> {
        let Ok(key) = SettingName::new(name) else {
            return Ok(false);
        };

        self.storage.delete(&key).await
    }

    async fn warm_up(&self) -> Result<usize, DomainError> {
        Ok(0)
    }
}
