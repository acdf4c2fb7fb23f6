//! Editing surface - turns operator text into typed settings

use std::sync::Arc;

use tracing::info;

use crate::domain::DomainError;

use super::backend::SettingsBackend;
use super::entity::{Setting, SettingName};
use super::kind::SettingKind;
use super::value::SettingValue;

/// A form submission from an administrative surface
#[derive(Debug, Clone, PartialEq)]
pub struct SettingSubmission {
    pub name: String,
    pub kind: SettingKind,
    pub raw_value: String,
    pub app: Option<String>,
}

impl SettingSubmission {
    pub fn new(name: impl Into<String>, kind: SettingKind, raw_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            raw_value: raw_value.into(),
            app: None,
        }
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }
}

/// Validates operator input and writes it through the configured backend, so a
/// cache-fronted backend stays in sync with edits.
#[derive(Clone)]
pub struct SettingEditor {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingEditor {
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self { backend }
    }

    /// Saves a submission, defining the setting if it does not exist yet.
    ///
    /// An existing setting keeps its declared kind; submitting another kind is a
    /// `TypeMismatch` and nothing is written.
    pub async fn submit(&self, submission: SettingSubmission) -> Result<SettingValue, DomainError> {
        let name = SettingName::new(submission.name)?;
        let value = submission.kind.coerce(&submission.raw_value)?;

        match self.backend.find(name.as_str()).await? {
            Some(existing) => {
                if existing.kind() != submission.kind {
                    return Err(DomainError::type_mismatch(
                        name.as_str(),
                        existing.kind(),
                        submission.kind,
                    ));
                }
                self.backend.set(name.as_str(), value).await
            }
            None => {
                let mut setting = Setting::new(name, submission.kind, value)?;

                if let Some(app) = submission.app {
                    setting = setting.with_app(app);
                }

                let created = self.backend.create(setting).await?;
                info!(name = %created.name(), kind = %created.kind(), "Defined setting");
                Ok(created.into_value())
            }
        }
    }

    /// Updates an existing setting from text, coerced with its declared kind
    pub async fn update(&self, name: &str, raw_value: &str) -> Result<SettingValue, DomainError> {
        let existing = self
            .backend
            .find(name)
            .await?
            .ok_or_else(|| DomainError::setting_does_not_exist(name))?;

        let value = existing.kind().coerce(raw_value)?;
        self.backend.set(name, value).await
    }

    /// Current value rendered as editable text
    pub async fn render(&self, name: &str) -> Result<Option<String>, DomainError> {
        Ok(self
            .backend
            .find(name)
            .await?
            .map(|setting| setting.value().render()))
    }
}
