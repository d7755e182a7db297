//! A repository metadata directory on disk.

use std::path::{Path, PathBuf};

use crate::error::SyncResult;
use crate::lock::WriteLock;
use crate::traits::MetadataStore;

/// Name of the lock file inside the metadata directory.
pub const LOCK_FILE: &str = "wlock";

/// The metadata directory of a repository, locked through `<root>/wlock`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataDir {
    root: PathBuf,
}

impl MetadataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MetadataStore for MetadataDir {
    type Guard = WriteLock;

    fn acquire_write_lock(&self) -> SyncResult<WriteLock> {
        WriteLock::acquire(&self.root.join(LOCK_FILE))
    }

    fn metadata_path(&self, segments: &[&str]) -> PathBuf {
        segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}
