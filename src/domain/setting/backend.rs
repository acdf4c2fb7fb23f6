//! Settings backend trait and backend selection

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::{Setting, SettingFilter};
use super::value::SettingValue;

#[cfg(test)]
use mockall::automock;

/// Supported backend implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Reads and writes go straight to durable storage
    Database,
    /// Reads are served from a TTL cache in front of durable storage
    Cache,
}

impl BackendType {
    /// Resolves the configured backend identifier.
    ///
    /// A missing or unrecognized identifier is a startup-time
    /// `InvalidConfiguration` error.
    pub fn resolve(identifier: Option<&str>) -> Result<Self, DomainError> {
        match identifier {
            Some(id) if !id.trim().is_empty() => id.parse(),
            _ => Err(DomainError::invalid_configuration(
                "The settings backend must be configured (settings.backend = database | cache)",
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Database => "database",
            BackendType::Cache => "cache",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "database" | "db" | "databasebackend" => Ok(BackendType::Database),
            "cache" | "cached" | "cachebackend" => Ok(BackendType::Cache),
            _ => Err(DomainError::invalid_configuration(format!(
                "Unknown settings backend: {}. Valid backends: database, cache",
                s
            ))),
        }
    }
}

/// Read/write access to settings.
///
/// `get` never fails for a missing name: it yields the configured not-found value,
/// or `None` when none is configured. `set` only updates existing records.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Which implementation this is
    fn backend_type(&self) -> BackendType;

    /// Lists settings, restricted by the filter's application tags
    async fn get_all(&self, filter: &SettingFilter) -> Result<Vec<Setting>, DomainError>;

    /// Returns the current value of a setting
    async fn get(&self, name: &str) -> Result<Option<SettingValue>, DomainError>;

    /// Updates the value of an existing setting
    async fn set(&self, name: &str, value: SettingValue) -> Result<SettingValue, DomainError>;

    /// Returns the full stored record, bypassing any cache
    async fn find(&self, name: &str) -> Result<Option<Setting>, DomainError>;

    /// Defines a new setting
    async fn create(&self, setting: Setting) -> Result<Setting, DomainError>;

    /// Removes a setting, returns true if it existed
    async fn delete(&self, name: &str) -> Result<bool, DomainError>;

    /// Pre-populates any read cache, returns the number of entries written
    async fn warm_up(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_type_from_str() {
        assert_eq!("database".parse::<BackendType>().unwrap(), BackendType::Database);
        assert_eq!("DB".parse::<BackendType>().unwrap(), BackendType::Database);
        assert_eq!(
            "DatabaseBackend".parse::<BackendType>().unwrap(),
            BackendType::Database
        );
        assert_eq!("cache".parse::<BackendType>().unwrap(), BackendType::Cache);
        assert_eq!("CacheBackend".parse::<BackendType>().unwrap(), BackendType::Cache);
    }

    #[test]
    fn test_resolve_missing_identifier() {
        assert!(matches!(
            BackendType::resolve(None),
            Err(DomainError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            BackendType::resolve(Some("  ")),
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_resolve_unknown_identifier() {
        let err = BackendType::resolve(Some("memcached")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("memcached"));
    }

    #[test]
    fn test_backend_type_display() {
        assert_eq!(BackendType::Database.to_string(), "database");
        assert_eq!(BackendType::Cache.to_string(), "cache");
    }
}
