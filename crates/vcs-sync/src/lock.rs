//! Exclusive repository write lock.
//!
//! The lock is an OS-level advisory lock on a file in the metadata directory
//! (`wlock` by convention). Acquisition never waits: if another process or
//! another handle in this process holds it, [`WriteLock::acquire`] fails with
//! [`SyncError::LockUnavailable`]. The guard releases the lock when dropped,
//! whichever way the holder's scope is left.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};

/// A held write lock.
#[derive(Debug)]
pub struct WriteLock {
    path: PathBuf,
    file: File,
}

impl WriteLock {
    /// Take the lock at `path`, creating the file and its directory if needed.
    pub fn acquire(path: &Path) -> SyncResult<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %path.display(), "write lock acquired");
                Ok(Self {
                    path: path.to_path_buf(),
                    file,
                })
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(SyncError::LockUnavailable(path.display().to_string()))
            }
            Err(e) => Err(SyncError::Lock(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        match FileExt::unlock(&self.file) {
            Ok(()) => debug!(path = %self.path.display(), "write lock released"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to release write lock"),
        }
    }
}
