//! Domain layer - Core entities and the traits infrastructure implements

pub mod cache;
pub mod error;
pub mod setting;
pub mod storage;

pub use cache::{Cache, CacheExt, CacheKeyGenerator, PrefixKeyGenerator};
pub use error::DomainError;
pub use setting::{
    BackendType, Setting, SettingEditor, SettingFilter, SettingKind, SettingName,
    SettingSubmission, SettingValue, Settings, SettingsBackend,
};
pub use storage::{Storage, StorageEntity, StorageKey};
