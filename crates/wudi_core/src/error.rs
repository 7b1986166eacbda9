use thiserror::Error;

/// Errors raised by the directory and configuration layers.
///
/// Storage failures have their own type (`store::StoreError`) and are
/// normally absorbed by the store rather than surfaced here.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn game_not_found(id: &str) -> Self {
        CoreError::NotFound { kind: "Game", id: id.to_string() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
