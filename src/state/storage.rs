//! Durable key/value storage for view state slices.
//!
//! Values are JSON strings; the storage never interprets them.

use super::StateError;
use log::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// String-keyed storage for JSON-encoded values.
///
pub trait Storage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StateError>;
    fn remove(&mut self, key: &str) -> Result<(), StateError>;
    fn clear(&mut self) -> Result<(), StateError>;
}

/// Storage mirrored to a single JSON file, rewritten on every change.
///
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file at `path`. A missing or unreadable file starts
    /// out empty.
    ///
    pub fn open(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        "Ignoring corrupt view state file {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        FileStorage {
            path: path.to_path_buf(),
            entries,
        }
    }

    fn flush(&self) -> Result<(), StateError> {
        let write_failed = |source| StateError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(write_failed)?;
            }
        }
        let contents =
            serde_json::to_string_pretty(&self.entries).map_err(|e| StateError::EncodeFailed {
                key: self.path.display().to_string(),
                source: e,
            })?;
        fs::write(&self.path, contents).map_err(write_failed)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StateError> {
        self.entries.insert(key.to_owned(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StateError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StateError> {
        self.entries.clear();
        self.flush()
    }
}

/// In-memory storage. Clones share the same entries, so dropping one handle
/// and loading from a clone behaves like a reload.
///
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StateError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StateError::StoragePoisoned)?;
        entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StateError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StateError::StoragePoisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StateError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StateError::StoragePoisoned)?;
        entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("issue-dash-test-{}-{}", name, std::process::id()))
            .join("state.json")
    }

    #[test]
    fn file_storage_survives_reopen() {
        let path = temp_path("reopen");
        let mut storage = FileStorage::open(&path);
        storage.set("issues-page", "3".to_string()).unwrap();
        storage.set("issues-search", "\"login\"".to_string()).unwrap();

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("issues-page").as_deref(), Some("3"));
        assert_eq!(reopened.get("issues-search").as_deref(), Some("\"login\""));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_storage_ignores_corrupt_file() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get("issues-page"), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_storage_clear_removes_everything() {
        let path = temp_path("clear");
        let mut storage = FileStorage::open(&path);
        storage.set("dark-mode", "true".to_string()).unwrap();
        storage.clear().unwrap();
        assert_eq!(FileStorage::open(&path).get("dark-mode"), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let mut storage = MemoryStorage::new();
        let reloaded = storage.clone();
        storage.set("issues-page", "1".to_string()).unwrap();
        assert_eq!(reloaded.get("issues-page").as_deref(), Some("1"));
        storage.remove("issues-page").unwrap();
        assert_eq!(reloaded.get("issues-page"), None);
    }
}
