use thiserror::Error;

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("storage serialization error: {0}")]
    Serde(String),

    #[error("storage io error: {0}")]
    Io(String),

    #[error("storage snapshot error: {0}")]
    Snapshot(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Serde(error.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::Io(error.to_string())
    }
}
