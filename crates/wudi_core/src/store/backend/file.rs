//! File-backed storage: one file per key under `<dir>/<origin>/`.
//!
//! Several processes pointed at the same directory see the same key space,
//! like tabs on one origin. Each write replaces exactly one file via an
//! atomic rename, so concurrent writers race per key (last write wins) and
//! never disturb other keys.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{entry_size, StorageBackend};
use crate::store::error::StoreError;

const VALUE_EXTENSION: &str = "json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileStorage {
    /// Open (creating if needed) the key space for `origin` under `dir`.
    pub fn open(dir: impl AsRef<Path>, origin: &str) -> Result<Self, StoreError> {
        let root = dir.as_ref().join(encode_key(origin));
        fs::create_dir_all(&root)?;
        log::debug!("File storage opened at {:?}", root);
        Ok(Self { root, quota_bytes: None })
    }

    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", encode_key(key), VALUE_EXTENSION))
    }

    /// Bytes used by every key except `exclude`
    fn usage_excluding(&self, exclude: &str) -> Result<usize, StoreError> {
        let mut total = 0;
        for key in self.keys()? {
            if key == exclude {
                continue;
            }
            if let Some(value) = self.get_item(&key)? {
                total += entry_size(&key, &value);
            }
        }
        Ok(total)
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.quota_bytes {
            let size = self.usage_excluding(key)? + entry_size(key, value);
            if size > limit {
                return Err(StoreError::QuotaExceeded { key: key.to_string(), size, limit });
            }
        }

        let path = self.path_for(key);
        // Unique per process and per write, so writers never share a temp file
        let temp_path = self.root.join(format!(
            "{}.{}.{}.tmp",
            encode_key(key),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.flush()?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Io(e));
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match decode_key(stem) {
                Some(key) => keys.push(key),
                None => log::warn!("Ignoring unrecognized storage file {:?}", path),
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Escape everything outside `[A-Za-z0-9_]` as `%XX`, so every key maps to
/// its own portable file name.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_and_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        let first = FileStorage::open(temp_dir.path(), "wudi").unwrap();
        first.set_item("game-g1-t1-stats", r#"{"p1":{"assists":0,"goals":2}}"#).unwrap();

        let second = FileStorage::open(temp_dir.path(), "wudi").unwrap();
        assert_eq!(
            second.get_item("game-g1-t1-stats").unwrap().as_deref(),
            Some(r#"{"p1":{"assists":0,"goals":2}}"#)
        );
        assert_eq!(second.keys().unwrap(), vec!["game-g1-t1-stats".to_string()]);
    }

    #[test]
    fn test_origins_are_separate() {
        let temp_dir = TempDir::new().unwrap();
        let a = FileStorage::open(temp_dir.path(), "a").unwrap();
        let b = FileStorage::open(temp_dir.path(), "b").unwrap();

        a.set_item("k", "1").unwrap();
        assert_eq!(b.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path(), "wudi").unwrap();
        storage.set_item("k", "{}").unwrap();

        let leftovers: Vec<_> = fs::read_dir(storage.root())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_threads_writing_one_key_all_succeed() {
        let temp_dir = TempDir::new().unwrap();
        let storage = std::sync::Arc::new(FileStorage::open(temp_dir.path(), "wudi").unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let storage = storage.clone();
                std::thread::spawn(move || {
                    for n in 0..25 {
                        storage.set_item("shared", &format!("{{\"w\":{}}}", i * 100 + n)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let value = storage.get_item("shared").unwrap().unwrap();
        assert!(value.starts_with("{\"w\":"));
        assert_eq!(storage.keys().unwrap(), vec!["shared".to_string()]);
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path(), "wudi").unwrap();
        storage.remove_item("never").unwrap();
        storage.set_item("k", "1").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_quota() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path(), "wudi").unwrap().with_quota(8);

        storage.set_item("a", "123").unwrap();
        let err = storage.set_item("b", "12345").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(storage.get_item("b").unwrap(), None);
    }

    #[test]
    fn test_key_encoding_is_reversible_and_distinct() {
        for key in ["game-g1-t1-attendance", "a%2Db", "a-b", "ünï côdé", "x.y/z"] {
            assert_eq!(decode_key(&encode_key(key)).as_deref(), Some(key));
        }
        assert_ne!(encode_key("a-b"), encode_key("a%2Db"));
        assert_eq!(encode_key("a-b"), "a%2Db");
    }
}
