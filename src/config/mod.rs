//! Configuration - layered application configuration

mod app_config;

pub use app_config::{AppConfig, LogFormat, LoggingConfig, SettingsConfig};
