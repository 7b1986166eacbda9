use std::collections::HashMap;
use std::sync::RwLock;

use super::{entry_size, StorageBackend};
use crate::store::error::StoreError;

/// In-process backend. Clones of a `KeyedLocalStore` built on one
/// `MemoryStorage` share it the way tabs share an origin.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self { items: RwLock::default(), quota_bytes: Some(quota_bytes) }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the raw key space
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.items.read().map(|items| items.clone()).unwrap_or_default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.read().map_err(|_| StoreError::poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::poisoned())?;

        if let Some(limit) = self.quota_bytes {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let size = others + entry_size(key, value);
            if size > limit {
                return Err(StoreError::QuotaExceeded { key: key.to_string(), size, limit });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::poisoned())?;
        items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let items = self.items.read().map_err(|_| StoreError::poisoned())?;
        let mut keys: Vec<String> = items.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
