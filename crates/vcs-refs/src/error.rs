//! Error types for remote-name operations.

use thiserror::Error;

/// Errors that can occur while encoding, decoding, or storing remote names.
#[derive(Debug, Error)]
pub enum RefError {
    /// A name or remote path cannot be represented in the file format.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A remote-name file could not be parsed.
    #[error("corrupt remote-name file at line {line}: {reason}")]
    CorruptFormat { line: usize, reason: String },

    /// The file was written by a newer storage format.
    #[error("unsupported remote-name format version {0}")]
    UnsupportedVersion(u32),

    /// I/O error while reading or writing a remote-name file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for remote-name operations.
pub type Result<T> = std::result::Result<T, RefError>;
