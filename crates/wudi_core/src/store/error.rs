use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Quota exceeded writing '{key}': {size} bytes exceeds the {limit} byte budget")]
    QuotaExceeded { key: String, size: usize, limit: usize },

    #[error("Malformed value under '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether retrying the same operation later could succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Unavailable(_) => true,
            StoreError::QuotaExceeded { .. } => true, // after something else is removed
            StoreError::Io(_) => true,
            StoreError::Malformed { .. } => false,
            StoreError::Serialization(_) => false,
        }
    }

    pub(crate) fn poisoned() -> Self {
        StoreError::Unavailable("storage lock poisoned".to_string())
    }
}
