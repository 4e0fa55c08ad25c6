use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::keys::StorageKey;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Client-local durable key/value store.
///
/// The owning component is the only writer for its key; concurrent writers
/// simply overwrite each other.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<StorageKey, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the keys currently present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn present_keys(&self) -> Result<Vec<StorageKey>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut keys: Vec<_> = guard.keys().copied().collect();
        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key);
        Ok(())
    }
}

/// Typed access to the client store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub store: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn get_string(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        self.store.get(key).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn set_string(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.store.set(key, value).await
    }

    /// Read and decode a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored text is not valid
    /// JSON for `T`, or other storage errors.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        key: StorageKey,
    ) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(format!("{key}: {err}")))
    }

    /// Encode a value as JSON and overwrite `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails, or other storage errors.
    pub async fn set_json<T: Serialize + Sync>(
        &self,
        key: StorageKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|err| StorageError::Serialization(format!("{key}: {err}")))?;
        self.store.set(key, &raw).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.store.remove(key).await
    }

    /// Remove every listed key, attempting all of them even if one fails.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` encountered.
    pub async fn remove_all(
        &self,
        keys: impl IntoIterator<Item = StorageKey>,
    ) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in keys {
            if let Err(err) = self.store.remove(key).await {
                tracing::warn!(%key, error = %err, "failed to clear storage key");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: String,
        step: u8,
    }

    #[tokio::test]
    async fn json_values_round_trip() {
        let storage = Storage::in_memory();
        let record = Record {
            id: "s-1".into(),
            step: 2,
        };
        storage
            .set_json(StorageKey::PolyaPracticeSession, &record)
            .await
            .unwrap();

        let fetched: Option<Record> = storage
            .get_json(StorageKey::PolyaPracticeSession)
            .await
            .unwrap();
        assert_eq!(fetched, Some(record));
    }

    #[tokio::test]
    async fn corrupted_json_is_a_serialization_error() {
        let storage = Storage::in_memory();
        storage
            .set_string(StorageKey::PracticeSession, "{oops")
            .await
            .unwrap();

        let err = storage
            .get_json::<Record>(StorageKey::PracticeSession)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn remove_all_clears_listed_keys_only() {
        let mem = InMemoryStore::new();
        let storage = Storage::new(Arc::new(mem.clone()));
        for key in StorageKey::ALL {
            storage.set_string(key, "x").await.unwrap();
        }

        storage
            .remove_all(StorageKey::SCAFFOLDING_SESSIONS)
            .await
            .unwrap();

        let present = mem.present_keys().unwrap();
        assert_eq!(present.len(), StorageKey::ALL.len() - 3);
        assert!(!present.contains(&StorageKey::PracticeSession));
        assert!(present.contains(&StorageKey::Token));
    }
}
