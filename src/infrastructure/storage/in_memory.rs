//! In-memory storage implementation

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Process-local storage; `list` returns entities ordered by key.
///
/// Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<BTreeMap<String, E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates storage pre-populated with entities; later duplicates win
    pub fn with_entities(entities: impl IntoIterator<Item = E>) -> Self {
        let map = entities
            .into_iter()
            .map(|entity| (entity.key().as_str().to_string(), entity))
            .collect();

        Self {
            entities: RwLock::new(map),
        }
    }
}

/// Records are compared by their serialized form, the same form durable storage holds
fn encode<E: StorageEntity>(entity: &E) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(entity)
        .map_err(|e| DomainError::storage(format!("Failed to serialize entity: {}", e)))
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        Ok(self.entities.read().await.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        Ok(self.entities.read().await.values().cloned().collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.entities.write().await;

        if entities.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.entities.write().await;

        match entities.get_mut(&key) {
            Some(existing) => {
                *existing = entity.clone();
                Ok(entity)
            }
            None => Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            ))),
        }
    }

    async fn compare_and_swap(&self, current: &E, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let expected = encode(current)?;
        let mut entities = self.entities.write().await;

        let Some(existing) = entities.get_mut(&key) else {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        };

        if encode(&*existing)? != expected {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' was modified concurrently",
                key
            )));
        }

        *existing = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.entities.write().await.remove(key.as_str()).is_some())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.entities.read().await.contains_key(key.as_str()))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.entities.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::setting::{Setting, SettingName, SettingValue};

    fn setting(name: &str, value: impl Into<SettingValue>) -> Setting {
        Setting::from_value(SettingName::new(name).unwrap(), value.into())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let storage: InMemoryStorage<Setting> = InMemoryStorage::new();
        let created = storage.create(setting("mybool", true)).await.unwrap();

        let fetched = storage.get(created.name()).await.unwrap().unwrap();
        assert_eq!(fetched.value(), &SettingValue::Boolean(true));
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let storage: InMemoryStorage<Setting> = InMemoryStorage::new();
        storage.create(setting("mybool", true)).await.unwrap();

        let result = storage.create(setting("mybool", false)).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_existing_only() {
        let storage = InMemoryStorage::with_entities([setting("mystring", "a")]);

        storage.update(setting("mystring", "b")).await.unwrap();
        let fetched = storage
            .get(&SettingName::new("mystring").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.value(), &SettingValue::from("b"));

        let result = storage.update(setting("missing", "x")).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_compare_and_swap_rejects_stale_record() {
        let storage = InMemoryStorage::with_entities([setting("retries", 3_i64)]);
        let key = SettingName::new("retries").unwrap();
        let read = storage.get(&key).await.unwrap().unwrap();

        // Recreated with another kind after `read` was taken
        storage.delete(&key).await.unwrap();
        storage.create(setting("retries", "three")).await.unwrap();

        let mut stale = read.clone();
        stale.set_value(SettingValue::Integer(4)).unwrap();
        let result = storage.compare_and_swap(&read, stale).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(
            storage.get(&key).await.unwrap().unwrap().value(),
            &SettingValue::from("three")
        );
    }

    #[tokio::test]
    async fn test_compare_and_swap_replaces_unchanged_record() {
        let storage = InMemoryStorage::with_entities([setting("retries", 3_i64)]);
        let key = SettingName::new("retries").unwrap();
        let read = storage.get(&key).await.unwrap().unwrap();

        let mut updated = read.clone();
        updated.set_value(SettingValue::Integer(4)).unwrap();
        storage.compare_and_swap(&read, updated).await.unwrap();

        assert_eq!(
            storage.get(&key).await.unwrap().unwrap().value(),
            &SettingValue::Integer(4)
        );

        storage.delete(&key).await.unwrap();
        let result = storage.compare_and_swap(&read, read.clone()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let storage = InMemoryStorage::with_entities([
            setting("zeta", 1_i64),
            setting("alpha", 2_i64),
            setting("mid", 3_i64),
        ]);

        let names: Vec<String> = storage
            .list()
            .await
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();

        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_delete_and_exists() {
        let storage = InMemoryStorage::with_entities([setting("myfloat", 3.142_f64)]);
        let key = SettingName::new("myfloat").unwrap();

        assert!(storage.exists(&key).await.unwrap());
        assert!(storage.delete(&key).await.unwrap());
        assert!(!storage.delete(&key).await.unwrap());
        assert!(!storage.exists(&key).await.unwrap());
        assert_eq!(storage.count().await.unwrap(), 0);
    }
}
