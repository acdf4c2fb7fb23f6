//! Settings facade - the entry point application code reads settings through

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::domain::DomainError;

use super::backend::{BackendType, SettingsBackend};
use super::editor::SettingEditor;
use super::entity::SettingFilter;
use super::value::SettingValue;

/// Handle over the single backend chosen at startup.
///
/// Cloning is cheap; every clone shares the same backend instance.
#[derive(Clone)]
pub struct Settings {
    backend: Arc<dyn SettingsBackend>,
    filter: SettingFilter,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("backend", &self.backend.backend_type())
            .field("filter", &self.filter)
            .finish()
    }
}

impl Settings {
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self {
            backend,
            filter: SettingFilter::all(),
        }
    }

    /// Restricts `names` to settings owned by the filter's applications
    pub fn with_filter(mut self, filter: SettingFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> &SettingFilter {
        &self.filter
    }

    pub fn backend(&self) -> &Arc<dyn SettingsBackend> {
        &self.backend
    }

    pub fn backend_type(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Current value of `name`, or the configured not-found value
    pub async fn get(&self, name: &str) -> Result<Option<SettingValue>, DomainError> {
        self.backend.get(name).await
    }

    /// Current value of `name` deserialized into `T`
    pub async fn get_as<T>(&self, name: &str) -> Result<Option<T>, DomainError>
    where
        T: DeserializeOwned,
    {
        match self.backend.get(name).await? {
            Some(value) => serde_json::from_value(value.to_json())
                .map(Some)
                .map_err(|e| {
                    DomainError::validation(format!(
                        "Setting '{}' holds a {} that cannot be read as the requested type: {}",
                        name,
                        value.kind(),
                        e
                    ))
                }),
            None => Ok(None),
        }
    }

    /// Updates an existing setting
    pub async fn set(
        &self,
        name: &str,
        value: impl Into<SettingValue>,
    ) -> Result<SettingValue, DomainError> {
        self.backend.set(name, value.into()).await
    }

    /// Names of the known settings, sorted
    pub async fn names(&self) -> Result<Vec<String>, DomainError> {
        let mut names: Vec<String> = self
            .backend
            .get_all(&self.filter)
            .await?
            .into_iter()
            .map(|s| s.name().as_str().to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Editing surface writing through the same backend
    pub fn editor(&self) -> SettingEditor {
        SettingEditor::new(self.backend.clone())
    }
}
