use crate::error::StorageError;
use crate::storage::memory::size_after_write;
use crate::storage::traits::KeyValueStore;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Key/value store kept in a single JSON object file.
///
/// The file is re-read on every call, so writes made by another process
/// sharing the same path are visible to the next `get`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    quota: Option<usize>,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_quota(path: impl Into<PathBuf>, quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    /// Entries to rewrite; an unparseable file is replaced rather than kept
    fn load_for_write(&self) -> Result<HashMap<String, String>, StorageError> {
        match self.load() {
            Err(StorageError::Corrupt(reason)) => {
                warn!("Discarding unreadable store {}", reason);
                Ok(HashMap::new())
            }
            other => other,
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.load()?.remove(key).map(String::into_bytes))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let value = std::str::from_utf8(value)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;

        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut entries = self.load_for_write()?;
        if let Some(quota) = self.quota {
            let needed = size_after_write(&entries, key, value.len());
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut entries = self.load_for_write()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
