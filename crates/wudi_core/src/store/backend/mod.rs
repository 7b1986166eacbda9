//! Storage backends
//!
//! A backend is a flat string-to-string map scoped to one origin, the same
//! contract a browser's local storage offers. Values are already-encoded
//! JSON text; backends never look inside them.

pub mod file;
pub mod memory;

use super::error::StoreError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub trait StorageBackend: Send + Sync {
    /// `Ok(None)` when the key has never been written (or was removed).
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`. On error the previous value is kept.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;

    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Bytes a key/value pair counts against an origin's quota.
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
