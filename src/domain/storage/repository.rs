//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageEntity;

/// Durable record storage keyed by the entity's key
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    /// Retrieves an entity by its key
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    /// Retrieves all entities
    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Creates a new entity, returns `Conflict` if the key is taken
    async fn create(&self, entity: E) -> Result<E, DomainError>;

    /// Replaces an existing entity, returns `NotFound` if the key is absent
    async fn update(&self, entity: E) -> Result<E, DomainError>;

    /// Replaces `current` with `entity` only while the stored record still equals `current`.
    ///
    /// Returns `NotFound` if the key is absent and `Conflict` if the record changed since
    /// `current` was read.
    async fn compare_and_swap(&self, current: &E, entity: E) -> Result<E, DomainError>;

    /// Deletes an entity by its key, returns true if deleted
    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError>;

    /// Checks if an entity exists by its key
    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Returns the count of entities
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::storage::StorageKey;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Storage double that counts reads and writes
    #[derive(Debug)]
    pub struct MockStorage<E>
    where
        E: StorageEntity,
    {
        entities: Mutex<HashMap<String, E>>,
        reads: Mutex<usize>,
        writes: Mutex<usize>,
        error: Mutex<Option<String>>,
    }

    impl<E> Default for MockStorage<E>
    where
        E: StorageEntity,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<E> MockStorage<E>
    where
        E: StorageEntity,
    {
        pub fn new() -> Self {
            Self {
                entities: Mutex::new(HashMap::new()),
                reads: Mutex::new(0),
                writes: Mutex::new(0),
                error: Mutex::new(None),
            }
        }

        pub fn with_entity(self, entity: E) -> Self {
            self.entities
                .lock()
                .unwrap()
                .insert(entity.key().as_str().to_string(), entity);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        /// Number of get/list calls served
        pub fn read_count(&self) -> usize {
            *self.reads.lock().unwrap()
        }

        /// Number of create/update/delete calls served
        pub fn write_count(&self) -> usize {
            *self.writes.lock().unwrap()
        }

        /// Direct view of a stored entity, not counted as a read
        pub fn peek(&self, key: &str) -> Option<E> {
            self.entities.lock().unwrap().get(key).cloned()
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl<E> Storage<E> for MockStorage<E>
    where
        E: StorageEntity + 'static,
    {
        async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
            *self.reads.lock().unwrap() += 1;
            self.check_error()?;
            Ok(self
                .entities
                .lock()
                .unwrap()
                .get(key.as_str())
                .cloned())
        }

        async fn list(&self) -> Result<Vec<E>, DomainError> {
            *self.reads.lock().unwrap() += 1;
            self.check_error()?;
            Ok(self.entities.lock().unwrap().values().cloned().collect())
        }

        async fn create(&self, entity: E) -> Result<E, DomainError> {
            *self.writes.lock().unwrap() += 1;
            self.check_error()?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();

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
            *self.writes.lock().unwrap() += 1;
            self.check_error()?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();

            if !entities.contains_key(&key) {
                return Err(DomainError::not_found(format!(
                    "Entity with key '{}' not found",
                    key
                )));
            }

            entities.insert(key, entity.clone());
            Ok(entity)
        }

        async fn compare_and_swap(&self, current: &E, entity: E) -> Result<E, DomainError> {
            *self.writes.lock().unwrap() += 1;
            self.check_error()?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();

            let Some(existing) = entities.get(&key) else {
                return Err(DomainError::not_found(format!(
                    "Entity with key '{}' not found",
                    key
                )));
            };

            if serde_json::to_value(existing).ok() != serde_json::to_value(current).ok() {
                return Err(DomainError::conflict(format!(
                    "Entity with key '{}' was modified concurrently",
                    key
                )));
            }

            entities.insert(key, entity.clone());
            Ok(entity)
        }

        async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
            *self.writes.lock().unwrap() += 1;
            self.check_error()?;
            Ok(self
                .entities
                .lock()
                .unwrap()
                .remove(key.as_str())
                .is_some())
        }
    }
}
