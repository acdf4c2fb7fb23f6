//! Settings domain - typed values, the backend abstraction and the facade

mod backend;
mod editor;
mod entity;
mod facade;
mod kind;
mod value;

pub use backend::{BackendType, SettingsBackend};
pub use editor::{SettingEditor, SettingSubmission};
pub use entity::{MAX_NAME_LENGTH, Setting, SettingFilter, SettingName};
pub use facade::Settings;
pub use kind::SettingKind;
pub use value::SettingValue;

#[cfg(test)]
pub use backend::MockSettingsBackend;
