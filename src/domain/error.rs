use thiserror::Error;

use crate::domain::setting::SettingKind;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Setting does not exist: '{name}' has no record in the database")]
    SettingDoesNotExist { name: String },

    #[error("Invalid {kind} value '{raw}': {reason}")]
    InvalidValue {
        kind: SettingKind,
        raw: String,
        reason: String,
    },

    #[error("Type mismatch for setting '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: SettingKind,
        actual: SettingKind,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Unreadable cache entry '{key}': {message}")]
    UnreadableCacheEntry { key: String, message: String },
}

impl DomainError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub fn setting_does_not_exist(name: impl Into<String>) -> Self {
        Self::SettingDoesNotExist { name: name.into() }
    }

    pub fn invalid_value(
        kind: SettingKind,
        raw: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            kind,
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(name: impl Into<String>, expected: SettingKind, actual: SettingKind) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn unreadable_cache_entry(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnreadableCacheEntry {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_does_not_exist_error() {
        let error = DomainError::setting_does_not_exist("feature.enabled");
        assert_eq!(
            error.to_string(),
            "Setting does not exist: 'feature.enabled' has no record in the database"
        );
    }

    #[test]
    fn test_invalid_value_error_keeps_raw_text_and_kind() {
        let error = DomainError::invalid_value(SettingKind::Integer, "12abc", "not a number");
        assert_eq!(error.to_string(), "Invalid integer value '12abc': not a number");

        match error {
            DomainError::InvalidValue { kind, raw, .. } => {
                assert_eq!(kind, SettingKind::Integer);
                assert_eq!(raw, "12abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_type_mismatch_error() {
        let error =
            DomainError::type_mismatch("retries", SettingKind::Integer, SettingKind::String);
        assert_eq!(
            error.to_string(),
            "Type mismatch for setting 'retries': expected integer, got string"
        );
    }

    #[test]
    fn test_invalid_configuration_error() {
        let error = DomainError::invalid_configuration("backend is not set");
        assert_eq!(error.to_string(), "Invalid configuration: backend is not set");
    }
}
