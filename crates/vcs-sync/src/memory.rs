//! In-memory collaborators.
//!
//! [`InMemoryRepository`] keeps its changeset sets in memory but wraps a real
//! [`MetadataDir`], so files and the write lock behave exactly as they would
//! for a full repository.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use vcs_refs::{BranchHeads, Bookmarks};
use vcs_types::NodeId;

use crate::error::{SyncError, SyncResult};
use crate::lock::WriteLock;
use crate::metadata::MetadataDir;
use crate::traits::{LocalRepository, MetadataStore, Peer};

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    meta: MetadataDir,
    nodes: HashSet<NodeId>,
    obsolete: HashSet<NodeId>,
}

impl InMemoryRepository {
    /// A repository whose metadata directory is `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            meta: MetadataDir::new(root),
            ..Self::default()
        }
    }

    pub fn root(&self) -> &Path {
        self.meta.root()
    }

    pub fn add_node(&mut self, node: NodeId) {
        self.nodes.insert(node);
    }

    pub fn mark_obsolete(&mut self, node: NodeId) {
        self.obsolete.insert(node);
    }
}

impl MetadataStore for InMemoryRepository {
    type Guard = WriteLock;

    fn acquire_write_lock(&self) -> SyncResult<WriteLock> {
        self.meta.acquire_write_lock()
    }

    fn metadata_path(&self, segments: &[&str]) -> PathBuf {
        self.meta.metadata_path(segments)
    }
}

impl LocalRepository for InMemoryRepository {
    fn contains_node(&self, node: &NodeId) -> bool {
        self.nodes.contains(node)
    }

    fn is_obsolete(&self, node: &NodeId) -> bool {
        self.obsolete.contains(node)
    }
}

/// A peer that serves fixed names, optionally failing one of the calls.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPeer {
    url: String,
    bookmarks: Bookmarks,
    branches: BranchHeads,
    bookmarks_error: Option<String>,
    branches_error: Option<String>,
}

impl InMemoryPeer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_bookmark(mut self, name: impl Into<String>, node: Option<NodeId>) -> Self {
        self.bookmarks.insert(name.into(), node);
        self
    }

    pub fn with_branch(mut self, name: impl Into<String>, heads: Vec<NodeId>) -> Self {
        self.branches.insert(name.into(), heads);
        self
    }

    pub fn failing_bookmarks(mut self, reason: impl Into<String>) -> Self {
        self.bookmarks_error = Some(reason.into());
        self
    }

    pub fn failing_branch_heads(mut self, reason: impl Into<String>) -> Self {
        self.branches_error = Some(reason.into());
        self
    }
}

impl Peer for InMemoryPeer {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn list_bookmarks(&self) -> SyncResult<Bookmarks> {
        match &self.bookmarks_error {
            Some(reason) => Err(SyncError::Peer(reason.clone())),
            None => Ok(self.bookmarks.clone()),
        }
    }

    fn branch_heads(&self) -> SyncResult<BranchHeads> {
        match &self.branches_error {
            Some(reason) => Err(SyncError::Peer(reason.clone())),
            None => Ok(self.branches.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_path_delegates() {
        let repo = InMemoryRepository::new("/tmp/repo/.vc");
        assert_eq!(
            repo.metadata_path(&["remotenames", "branches"]),
            PathBuf::from("/tmp/repo/.vc/remotenames/branches")
        );
        assert_eq!(repo.root(), Path::new("/tmp/repo/.vc"));
    }

    #[test]
    fn node_sets() {
        let mut repo = InMemoryRepository::new("/unused");
        let n = NodeId::hash(b"n");
        assert!(!repo.contains_node(&n));
        repo.add_node(n);
        assert!(repo.contains_node(&n));
        assert!(!repo.is_obsolete(&n));
        repo.mark_obsolete(n);
        assert!(repo.is_obsolete(&n));
    }

    #[test]
    fn lock_lives_in_metadata_dir() {
        let dir = tempfile::tempdir().unwrap();
        let repo = InMemoryRepository::new(dir.path());
        let guard = repo.acquire_write_lock().unwrap();
        assert_eq!(guard.path(), dir.path().join(crate::metadata::LOCK_FILE));
        assert!(matches!(
            repo.acquire_write_lock(),
            Err(SyncError::LockUnavailable(_))
        ));
    }

    #[test]
    fn peer_serves_and_fails() {
        let n = NodeId::hash(b"x");
        let peer = InMemoryPeer::new("ssh://host/repo")
            .with_bookmark("b", Some(n))
            .with_branch("default", vec![n]);
        assert_eq!(peer.url(), "ssh://host/repo");
        assert_eq!(peer.list_bookmarks().unwrap()["b"], Some(n));
        assert_eq!(peer.branch_heads().unwrap()["default"], vec![n]);

        let broken = peer.failing_bookmarks("refused");
        assert!(matches!(broken.list_bookmarks(), Err(SyncError::Peer(r)) if r == "refused"));
    }
}
