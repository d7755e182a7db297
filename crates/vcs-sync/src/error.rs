use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("write lock unavailable: {0} is held by another process")]
    LockUnavailable(String),

    #[error("failed to acquire write lock: {0}")]
    Lock(std::io::Error),

    #[error("peer error: {0}")]
    Peer(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("remote names: {0}")]
    Refs(#[from] vcs_refs::RefError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
