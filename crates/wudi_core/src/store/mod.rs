//! Keyed local store
//!
//! Maps string keys to JSON values over a `StorageBackend`. Reads and
//! writes never fail from the caller's point of view: a missing, corrupt or
//! unreachable value reads as the caller's fallback, and a failed write is
//! logged and reported as `false`. The empty key means "unbound" and is a
//! no-op everywhere.

pub mod backend;
pub mod binding;
pub mod error;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub use backend::{FileStorage, MemoryStorage, StorageBackend};
pub use binding::{Binding, BindingState};
pub use error::StoreError;

#[derive(Clone)]
pub struct KeyedLocalStore {
    backend: Arc<dyn StorageBackend>,
}

impl fmt::Debug for KeyedLocalStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyedLocalStore").finish_non_exhaustive()
    }
}

impl KeyedLocalStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self { backend: Arc::new(backend) }
    }

    /// Build over a backend the caller keeps a handle to (tests inspect the
    /// raw key space this way).
    pub fn from_shared(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Read and decode `key`, reporting every failure.
    ///
    /// `Ok(None)` for an absent or unbound key.
    pub fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        if key.is_empty() {
            return Ok(None);
        }

        let Some(text) = self.backend.get_item(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Malformed { key: key.to_string(), source })
    }

    /// Read `key`, or `fallback` when it is absent, unbound, malformed or
    /// the backend is unavailable. Failures log one warning.
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.try_read(key) {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(e) => {
                log::warn!("Error reading storage key \"{}\": {}", key, e);
                fallback
            }
        }
    }

    pub fn try_write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        if key.is_empty() {
            return Ok(());
        }

        let text = serde_json::to_string(value).map_err(StoreError::Serialization)?;
        self.backend.set_item(key, &text)?;
        log::debug!("Stored {} bytes under \"{}\"", text.len(), key);
        Ok(())
    }

    /// Persist `value` under `key`. Returns whether it reached the backend;
    /// an unbound key returns `false` without touching anything.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        if key.is_empty() {
            return false;
        }

        match self.try_write(key, value) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Error writing storage key \"{}\": {}", key, e);
                false
            }
        }
    }

    /// Whether any text (well-formed or not) is stored under `key`.
    pub fn try_contains(&self, key: &str) -> Result<bool, StoreError> {
        if key.is_empty() {
            return Ok(false);
        }
        Ok(self.backend.get_item(key)?.is_some())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.try_contains(key).unwrap_or_else(|e| {
            log::warn!("Error reading storage key \"{}\": {}", key, e);
            false
        })
    }

    /// Write `default` only if nothing is stored under `key` yet. A corrupt
    /// value counts as present and is left for the next real write.
    pub fn ensure<T: Serialize + ?Sized>(&self, key: &str, default: &T) -> bool {
        if key.is_empty() {
            return false;
        }

        match self.backend.get_item(key) {
            Ok(Some(_)) => false,
            Ok(None) => {
                let written = self.write(key, default);
                if written {
                    log::info!("Initialized storage key \"{}\"", key);
                }
                written
            }
            Err(e) => {
                log::warn!("Error reading storage key \"{}\": {}", key, e);
                false
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }

        match self.backend.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Error removing storage key \"{}\": {}", key, e);
                false
            }
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_else(|e| {
            log::warn!("Error listing storage keys: {}", e);
            Vec::new()
        })
    }

    /// Bind `key` to an in-memory value with a persisting setter.
    pub fn bind<T>(&self, key: &str, initial: T) -> Binding<T>
    where
        T: Clone + Serialize + DeserializeOwned,
    {
        Binding::new(self.clone(), key, initial)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Backend whose every call fails, like storage blocked in privacy mode.
    pub struct UnavailableStorage;

    impl StorageBackend for UnavailableStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("blocked".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("blocked".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("blocked".to_string()))
        }

        fn keys(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("blocked".to_string()))
        }
    }

    pub fn shared_memory() -> (Arc<MemoryStorage>, KeyedLocalStore) {
        let memory = Arc::new(MemoryStorage::new());
        let store = KeyedLocalStore::from_shared(memory.clone());
        (memory, store)
    }
}
