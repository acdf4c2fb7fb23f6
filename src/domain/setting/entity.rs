//! Setting entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::DomainError;

use super::kind::SettingKind;
use super::value::SettingValue;

/// Longest accepted setting name; keeps the key indexable on every storage engine
pub const MAX_NAME_LENGTH: usize = 190;

/// Unique setting identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettingName(String);

impl SettingName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_setting_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SettingName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for SettingName {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SettingName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SettingName> for String {
    fn from(name: SettingName) -> Self {
        name.0
    }
}

/// A named, typed, persisted configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SettingRecord")]
pub struct Setting {
    name: SettingName,
    kind: SettingKind,
    value: SettingValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    app: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Wire shape of a `Setting`; converted through the same kind check as `Setting::new`
#[derive(Deserialize)]
struct SettingRecord {
    name: SettingName,
    kind: SettingKind,
    value: SettingValue,
    #[serde(default)]
    app: Option<String>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl TryFrom<SettingRecord> for Setting {
    type Error = DomainError;

    fn try_from(record: SettingRecord) -> Result<Self, Self::Error> {
        let mut setting = Setting::new(record.name, record.kind, record.value)?;
        setting.app = record.app;
        setting.created_at = record.created_at;
        setting.updated_at = record.updated_at;
        Ok(setting)
    }
}

impl Setting {
    /// Creates a setting, rejecting a value whose type differs from `kind`
    pub fn new(
        name: SettingName,
        kind: SettingKind,
        value: SettingValue,
    ) -> Result<Self, DomainError> {
        if value.kind() != kind {
            return Err(DomainError::type_mismatch(name.as_str(), kind, value.kind()));
        }

        let now = Utc::now();
        Ok(Self {
            name,
            kind,
            value,
            app: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a setting whose kind is taken from the value
    pub fn from_value(name: SettingName, value: SettingValue) -> Self {
        let now = Utc::now();
        Self {
            name,
            kind: value.kind(),
            value,
            app: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn name(&self) -> &SettingName {
        &self.name
    }

    pub fn kind(&self) -> SettingKind {
        self.kind
    }

    pub fn value(&self) -> &SettingValue {
        &self.value
    }

    pub fn into_value(self) -> SettingValue {
        self.value
    }

    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the value. The kind is immutable, so a value of another type is rejected.
    pub fn set_value(&mut self, value: SettingValue) -> Result<(), DomainError> {
        if value.kind() != self.kind {
            return Err(DomainError::type_mismatch(
                self.name.as_str(),
                self.kind,
                value.kind(),
            ));
        }

        self.value = value;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl StorageEntity for Setting {
    type Key = SettingName;

    fn key(&self) -> &Self::Key {
        &self.name
    }
}

/// Restricts `get_all` to settings owned by particular applications
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingFilter {
    apps: Vec<String>,
}

impl SettingFilter {
    /// A filter that matches every setting
    pub fn all() -> Self {
        Self::default()
    }

    pub fn apps<I, S>(apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            apps: apps.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn matches(&self, setting: &Setting) -> bool {
        if self.apps.is_empty() {
            return true;
        }

        setting
            .app()
            .is_some_and(|app| self.apps.iter().any(|a| a == app))
    }
}

fn validate_setting_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Setting name cannot be empty"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Setting name cannot exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }

    Ok(())
}
