use std::path::PathBuf;

use vcs_refs::{BranchHeads, Bookmarks};
use vcs_types::NodeId;

use crate::error::SyncResult;

/// The repository's private metadata area and its writer lock.
///
/// Enough to read and write remote names; pulling also needs the local
/// changeset store, see [`LocalRepository`].
pub trait MetadataStore {
    /// Held for the duration of a write; dropping it releases the lock.
    type Guard;

    /// Take the repository's writer lock without waiting.
    fn acquire_write_lock(&self) -> SyncResult<Self::Guard>;

    /// Path under the repository's private metadata directory.
    fn metadata_path(&self, segments: &[&str]) -> PathBuf;
}

/// The local repository, as seen by remote name synchronization.
pub trait LocalRepository: MetadataStore {
    /// Whether the changeset is present in the local object store.
    fn contains_node(&self, node: &NodeId) -> bool;

    /// Whether a locally present changeset has been marked obsolete.
    fn is_obsolete(&self, node: &NodeId) -> bool;
}

/// A remote peer whose names have already been fetched.
pub trait Peer {
    fn url(&self) -> String;
    fn list_bookmarks(&self) -> SyncResult<Bookmarks>;
    fn branch_heads(&self) -> SyncResult<BranchHeads>;
}
