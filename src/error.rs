use thiserror::Error;

/// Failures of a [`crate::storage::KeyValueStore`] backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage quota exceeded: write needs {needed} bytes, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("Value is not valid text: {0}")]
    Encoding(String),
}

/// Failures surfaced by the listing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid listing: {0}")]
    InvalidListing(String),

    #[error("Unable to save properties: storage quota exceeded")]
    StorageExhausted(#[source] StorageError),

    #[error("Failed to serialize properties: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures surfaced by the session store
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Signed in as {email}, which lacks the {required} role")]
    Forbidden { email: String, required: String },

    #[error("Failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type AuthResult<T> = Result<T, AuthError>;
