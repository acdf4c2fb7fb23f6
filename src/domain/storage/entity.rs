//! Storage entity traits

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be used as storage keys
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    /// Returns the key as a string for storage backends that require string keys
    fn as_str(&self) -> &str;
}

/// Trait for types that can be stored
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The key type for this entity
    type Key: StorageKey;

    /// Returns the entity's key
    fn key(&self) -> &Self::Key;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::setting::{Setting, SettingName, SettingValue};

    #[test]
    fn test_setting_is_keyed_by_name() {
        let name = SettingName::new("mystring").unwrap();
        let setting = Setting::from_value(name.clone(), SettingValue::from("test_string"));

        assert_eq!(setting.key(), &name);
        assert_eq!(StorageKey::as_str(setting.key()), "mystring");
    }
}
