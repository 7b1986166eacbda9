//! Storage configuration
//!
//! Defaults, then an optional JSON file named by `WUDI_CONFIG_PATH`, then
//! single-field overrides from `WUDI_STORAGE_DIR` / `WUDI_ORIGIN`. Empty
//! environment values are ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{CoreError, Result};
use crate::store::{FileStorage, KeyedLocalStore, MemoryStorage, StoreError};

pub const CONFIG_PATH_ENV: &str = "WUDI_CONFIG_PATH";
pub const STORAGE_DIR_ENV: &str = "WUDI_STORAGE_DIR";
pub const ORIGIN_ENV: &str = "WUDI_ORIGIN";

/// Browsers give an origin roughly 5 MiB of local storage
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// Root directory for the file backend
    pub dir: PathBuf,
    /// Separate key space per origin
    pub origin: String,
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            dir: PathBuf::from(".wudi"),
            origin: "wudi-site".to_string(),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl StorageConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StorageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_env() -> Result<Self> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Same as `load_from_env` with an injectable variable lookup.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config: StorageConfig = match var(CONFIG_PATH_ENV) {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    CoreError::InvalidConfig(format!(
                        "Failed to read config file from {CONFIG_PATH_ENV}='{path}': {e}"
                    ))
                })?;
                serde_json::from_str(&content).map_err(|e| {
                    CoreError::InvalidConfig(format!(
                        "Failed to parse config JSON from {CONFIG_PATH_ENV}='{path}': {e}"
                    ))
                })?
            }
            None => StorageConfig::default(),
        };

        if let Some(dir) = var(STORAGE_DIR_ENV) {
            config.dir = PathBuf::from(dir);
        }
        if let Some(origin) = var(ORIGIN_ENV) {
            config.origin = origin;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.origin.trim().is_empty() {
            return Err(CoreError::InvalidConfig("origin must not be empty".to_string()));
        }
        if self.origin.contains(['/', '\\']) || self.origin == "." || self.origin == ".." {
            return Err(CoreError::InvalidConfig(format!(
                "origin '{}' must not contain path separators",
                self.origin
            )));
        }
        if self.quota_bytes == 0 {
            return Err(CoreError::InvalidConfig("quota_bytes must be positive".to_string()));
        }
        Ok(())
    }

    pub fn open_store(&self) -> std::result::Result<KeyedLocalStore, StoreError> {
        let store = match self.backend {
            BackendKind::Memory => KeyedLocalStore::new(MemoryStorage::with_quota(self.quota_bytes)),
            BackendKind::File => KeyedLocalStore::new(
                FileStorage::open(&self.dir, &self.origin)?.with_quota(self.quota_bytes),
            ),
        };
        log::debug!("Opened {:?} store for origin '{}'", self.backend, self.origin);
        Ok(store)
    }
}
