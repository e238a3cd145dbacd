use crate::error::StorageError;
use crate::storage::traits::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process key/value store with an optional byte quota
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses writes once keys plus values would exceed `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Bytes currently used by keys and values
    pub fn used_bytes(&self) -> usize {
        used_bytes(&self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub(crate) fn used_bytes<V: AsRef<[u8]>>(entries: &HashMap<String, V>) -> usize {
    entries
        .iter()
        .map(|(key, value)| key.len() + value.as_ref().len())
        .sum()
}

/// Size of the map after `key` is replaced by a value of `value_len` bytes
pub(crate) fn size_after_write<V: AsRef<[u8]>>(
    entries: &HashMap<String, V>,
    key: &str,
    value_len: usize,
) -> usize {
    let current = used_bytes(entries);
    let replaced = entries
        .get(key)
        .map(|old| key.len() + old.as_ref().len())
        .unwrap_or(0);
    current - replaced + key.len() + value_len
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.lock();
        if let Some(quota) = self.quota {
            let needed = size_after_write(&entries, key, value.len());
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
