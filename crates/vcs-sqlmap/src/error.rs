/// Errors from mapping operations.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The key is not present in the table.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Error reported by SQLite, passed through unchanged.
    #[error("database error: {0}")]
    Backend(#[from] rusqlite::Error),

    /// I/O error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mapping configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MapError {
    /// Returns `true` for the "key not found" condition.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, MapError::KeyNotFound(_))
    }
}

/// Result alias for mapping operations.
pub type MapResult<T> = Result<T, MapError>;
