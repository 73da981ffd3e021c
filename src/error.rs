//! Memory Lane error types

use thiserror::Error;

/// Error returned by the record engine in [`crate::lane`].
#[derive(Error, Debug)]
pub enum LaneError {
    /// The addressed record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The request payload failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// SQLite error
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Filesystem error while reading or writing media
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding of a stored column failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LaneError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Result type alias for record engine operations
pub type Result<T> = std::result::Result<T, LaneError>;
