//! Storage factory for runtime storage selection

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::in_memory::InMemoryStorage;
use super::postgres::{DEFAULT_TABLE, PostgresConfig, PostgresStorage};

/// Supported storage types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StorageType {
    /// Process-local storage (testing/development)
    #[default]
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::invalid_configuration(format!(
                "Unknown storage backend: {}. Valid backends: in_memory, postgres",
                s
            ))),
        }
    }
}

impl TryFrom<String> for StorageType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::InMemory => write!(f, "in_memory"),
            StorageType::Postgres => write!(f, "postgres"),
        }
    }
}

/// Storage section of the application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageType,
    /// Required for the Postgres backend
    pub database_url: Option<String>,
    pub table: String,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageType::InMemory,
            database_url: None,
            table: DEFAULT_TABLE.to_string(),
            max_connections: 10,
        }
    }
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self {
            backend: StorageType::Postgres,
            database_url: Some(url.into()),
            ..Default::default()
        }
    }

    fn postgres_config(&self) -> Result<PostgresConfig, DomainError> {
        let url = self.database_url.clone().ok_or_else(|| {
            DomainError::invalid_configuration("database_url is required for Postgres storage")
        })?;

        Ok(PostgresConfig::new(url).with_max_connections(self.max_connections))
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a storage instance based on the configuration
    pub async fn create<E>(config: &StorageConfig) -> Result<Arc<dyn Storage<E>>, DomainError>
    where
        E: StorageEntity + 'static,
    {
        match config.backend {
            StorageType::InMemory => Ok(Arc::new(InMemoryStorage::<E>::new())),
            StorageType::Postgres => {
                let storage =
                    PostgresStorage::<E>::connect(&config.postgres_config()?, &config.table)
                        .await?;
                storage.ensure_table().await?;
                Ok(Arc::new(storage))
            }
        }
    }
}
