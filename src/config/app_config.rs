use std::time::Duration;

use serde::Deserialize;

use crate::domain::cache::DEFAULT_KEY_PREFIX;
use crate::domain::setting::{BackendType, SettingFilter, SettingValue};
use crate::domain::DomainError;
use crate::infrastructure::cache::CacheConfig;
use crate::infrastructure::storage::StorageConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub settings: SettingsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Settings store behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// `database` or `cache`; there is no default
    pub backend: Option<String>,
    pub cache_prefix: String,
    pub cache_ttl_secs: u64,
    /// Returned by `get` for unknown names, `None` when unset
    pub not_found_value: Option<SettingValue>,
    /// Owning applications whose settings are listed; empty lists everything
    pub apps: Vec<String>,
    /// Load every setting into the cache at startup (cache backend only)
    pub warm_cache_on_start: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            backend: None,
            cache_prefix: DEFAULT_KEY_PREFIX.to_string(),
            cache_ttl_secs: 3600,
            not_found_value: None,
            apps: Vec::new(),
            warm_cache_on_start: true,
        }
    }
}

impl SettingsConfig {
    pub fn backend_type(&self) -> Result<BackendType, DomainError> {
        BackendType::resolve(self.backend.as_deref())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn filter(&self) -> SettingFilter {
        SettingFilter::apps(self.apps.iter().cloned())
    }
}

impl AppConfig {
    /// Layers `config/default.*`, `config/local.*` and `APP__`-prefixed environment variables
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let builder = ::config::Config::builder()
            .add_source(::config::File::with_name("config/default").required(false))
            .add_source(::config::File::with_name("config/local").required(false))
            .add_source(
                ::config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("settings.apps")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    pub fn from_builder(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<Self, ::config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::CacheType;
    use crate::infrastructure::storage::StorageType;
    use ::config::{Config, File, FileFormat};

    fn parse(toml: &str) -> AppConfig {
        AppConfig::from_builder(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse("");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.storage.backend, StorageType::InMemory);
        assert_eq!(config.cache.cache_type, CacheType::InMemory);
        assert_eq!(config.settings.cache_prefix, "_dyn_settings_");
        assert_eq!(config.settings.cache_ttl(), Duration::from_secs(3600));
        assert!(config.settings.not_found_value.is_none());
        assert!(config.settings.warm_cache_on_start);
    }

    #[test]
    fn test_backend_is_required() {
        let config = parse("");

        assert!(matches!(
            config.settings.backend_type(),
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_full_file() {
        let config = parse(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [storage]
            backend = "postgres"
            database_url = "postgres://localhost/app"
            table = "app_settings"

            [cache]
            cache_type = "redis"
            redis_url = "redis://localhost:6379"

            [settings]
            backend = "cache"
            cache_prefix = "_mock_key_"
            cache_ttl_secs = 5
            apps = ["billing"]
            warm_cache_on_start = false

            [settings.not_found_value]
            type = "string"
            value = "__missing__"
            "#,
        );

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.storage.backend, StorageType::Postgres);
        assert_eq!(config.storage.table, "app_settings");
        assert_eq!(config.cache.cache_type, CacheType::Redis);
        assert_eq!(config.settings.backend_type().unwrap(), BackendType::Cache);
        assert_eq!(config.settings.cache_ttl(), Duration::from_secs(5));
        assert_eq!(config.settings.filter(), SettingFilter::apps(["billing"]));
        assert_eq!(
            config.settings.not_found_value,
            Some(SettingValue::from("__missing__"))
        );
        assert!(!config.settings.warm_cache_on_start);
    }

    #[test]
    fn test_unknown_cache_type_is_rejected() {
        let result = AppConfig::from_builder(Config::builder().add_source(File::from_str(
            "[cache]\ncache_type = \"memcached\"",
            FileFormat::Toml,
        )));

        assert!(result.is_err());
    }
}
