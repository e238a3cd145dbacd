use crate::error::StorageError;

/// Persisted key/value slot the stores write through.
///
/// Mirrors browser local storage: whole values are replaced on every `set`,
/// and a backend may refuse a write once it runs out of room.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the value under `key`
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Drop `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Read `key` as UTF-8 text
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.get(key)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| StorageError::Encoding(e.to_string())),
            None => Ok(None),
        }
    }
}
