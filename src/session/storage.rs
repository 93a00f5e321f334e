use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ClientError, ClientResult};

/// String key/value storage, shaped like browser web storage
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove_item(&self, key: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

fn poisoned<T>(_: T) -> ClientError {
    ClientError::Storage("storage lock poisoned".to_string())
}

/// Process-local storage; gone when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.items.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> ClientResult<()> {
        self.items
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> ClientResult<()> {
        self.items.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        self.items.lock().map_err(poisoned)?.clear();
        Ok(())
    }
}

/// Storage persisted as a pretty-printed JSON object in one file.
/// The file is re-read on every access so separate processes sharing it
/// see each other's writes.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ClientResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            ClientError::Storage(format!("{} is not valid JSON: {}", self.path.display(), e))
        })
    }

    fn save(&self, items: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>> {
        let _lock = self.guard.lock().map_err(poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> ClientResult<()> {
        let _lock = self.guard.lock().map_err(poisoned)?;
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> ClientResult<()> {
        let _lock = self.guard.lock().map_err(poisoned)?;
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        let _lock = self.guard.lock().map_err(poisoned)?;
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips_items() {
        let storage = MemoryStorage::new();
        storage.set_item("token", "t1").unwrap();
        storage.set_item("token", "t2").unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("t2"));

        storage.remove_item("token").unwrap();
        assert_eq!(storage.get_item("token").unwrap(), None);
    }

    #[test]
    fn file_storage_persists_between_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions").join("default.json");

        FileStorage::new(&path).set_item("role", "staff").unwrap();
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("role").unwrap().as_deref(), Some("staff"));

        reopened.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(reopened.get_item("role").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStorage::new(&path).get_item("user").unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
