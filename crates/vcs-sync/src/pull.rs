//! Refreshing remote names after a pull or clone.

use tracing::{info, warn};
use vcs_refs::{read_file, BranchHeads, RefKind, RemoteNames};

use crate::config::RemoteNamesConfig;
use crate::error::SyncResult;
use crate::traits::{LocalRepository, MetadataStore, Peer};
use crate::types::{PullSummary, SaveRequest};
use crate::writer::save_remote_names;

/// Keep only heads that exist locally and are not obsolete.
///
/// Branches whose heads are all dropped keep an empty entry; an empty list
/// produces no record on disk, so it reads back the same as a missing
/// branch. Returns the filtered map and the number of heads dropped.
pub fn filter_heads<R: LocalRepository + ?Sized>(repo: &R, heads: BranchHeads) -> (BranchHeads, usize) {
    let mut dropped = 0;
    let filtered = heads
        .into_iter()
        .map(|(branch, nodes)| {
            let before = nodes.len();
            let kept: Vec<_> = nodes
                .into_iter()
                .filter(|n| repo.contains_node(n) && !repo.is_obsolete(n))
                .collect();
            dropped += before - kept.len();
            (branch, kept)
        })
        .collect();
    (filtered, dropped)
}

/// Record what `peer` advertised as its remote names.
///
/// Bookmarks are stored as advertised. Branch heads go through
/// [`filter_heads`]. A kind switched off in `config` is neither requested
/// from the peer nor written.
pub fn pull_remote_names<R, P>(
    repo: &R,
    peer: &P,
    config: &RemoteNamesConfig,
) -> SyncResult<PullSummary>
where
    R: LocalRepository + ?Sized,
    P: Peer + ?Sized,
{
    let remote = peer.url();
    let mut request = SaveRequest::new(remote.clone());
    let mut summary = PullSummary {
        remote,
        ..PullSummary::default()
    };

    if config.bookmarks {
        let bookmarks = peer.list_bookmarks()?;
        summary.bookmarks = bookmarks.len();
        request = request.with_bookmarks(bookmarks);
    }

    if config.branches {
        let (heads, dropped) = filter_heads(repo, peer.branch_heads()?);
        if dropped > 0 {
            warn!(
                remote = %summary.remote,
                dropped,
                "ignoring remote heads that are unknown or obsolete"
            );
        }
        summary.branches = heads.len();
        summary.dropped_heads = dropped;
        request = request.with_branches(heads);
    }

    save_remote_names(repo, config, request)?;

    info!(
        remote = %summary.remote,
        branches = summary.branches,
        bookmarks = summary.bookmarks,
        dropped = summary.dropped_heads,
        "remote names updated"
    );
    Ok(summary)
}

/// Read both remote-name files and group them per remote path.
pub fn load_remote_names<R: MetadataStore + ?Sized>(
    repo: &R,
    config: &RemoteNamesConfig,
) -> SyncResult<RemoteNames> {
    let dir = repo.metadata_path(&[&config.dir_name]);
    let mut names = RemoteNames::new();
    for kind in RefKind::ALL {
        for (remote, table) in read_file(&dir, kind)? {
            names.entry(remote).or_default().absorb(table);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::memory::{InMemoryPeer, InMemoryRepository};
    use vcs_refs::Bookmarks;
    use vcs_types::NodeId;

    const REMOTE: &str = "https://example/repo";

    fn setup() -> (tempfile::TempDir, InMemoryRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = InMemoryRepository::new(dir.path().join(".vc"));
        (dir, repo)
    }

    #[test]
    fn filter_drops_unknown_and_obsolete() {
        let (_dir, mut repo) = setup();
        let h1 = NodeId::hash(b"h1");
        let h2 = NodeId::hash(b"h2");
        let h3 = NodeId::hash(b"h3");
        repo.add_node(h1);
        repo.add_node(h2);
        repo.mark_obsolete(h2);

        let mut heads = BranchHeads::new();
        heads.insert("default".into(), vec![h1, h2, h3]);
        let (kept, dropped) = filter_heads(&repo, heads);
        assert_eq!(kept["default"], vec![h1]);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn filter_keeps_empty_branch_entries() {
        let (_dir, repo) = setup();
        let mut heads = BranchHeads::new();
        heads.insert("gone".into(), vec![NodeId::hash(b"unknown")]);
        let (kept, dropped) = filter_heads(&repo, heads);
        assert_eq!(kept["gone"], Vec::<NodeId>::new());
        assert_eq!(dropped, 1);
    }

    #[test]
    fn filter_preserves_head_order() {
        let (_dir, mut repo) = setup();
        let a = NodeId::hash(b"a");
        let b = NodeId::hash(b"b");
        repo.add_node(a);
        repo.add_node(b);
        let mut heads = BranchHeads::new();
        heads.insert("default".into(), vec![b, a]);
        let (kept, _) = filter_heads(&repo, heads);
        assert_eq!(kept["default"], vec![b, a]);
    }

    #[test]
    fn pull_then_load() {
        let (_dir, mut repo) = setup();
        let live = NodeId::hash(b"live");
        repo.add_node(live);
        let stable = NodeId::hash(b"stable");

        let peer = InMemoryPeer::new(REMOTE)
            .with_bookmark("stable", Some(stable))
            .with_branch("default", vec![live]);
        let summary = pull_remote_names(&repo, &peer, &RemoteNamesConfig::default()).unwrap();
        assert_eq!(summary.remote, REMOTE);
        assert_eq!(summary.branches, 1);
        assert_eq!(summary.bookmarks, 1);
        assert_eq!(summary.dropped_heads, 0);

        let names = load_remote_names(&repo, &RemoteNamesConfig::default()).unwrap();
        let refs = &names[REMOTE];
        assert_eq!(refs.branches["default"], vec![live]);
        // bookmarks are not filtered against the local store
        assert_eq!(refs.bookmarks["stable"], Some(stable));
    }

    #[test]
    fn disabled_kind_is_not_requested_or_written() {
        let (_dir, repo) = setup();
        let peer = InMemoryPeer::new(REMOTE)
            .with_bookmark("stable", Some(NodeId::hash(b"s")))
            .failing_branch_heads("branch heads unavailable");
        let config = RemoteNamesConfig {
            branches: false,
            ..RemoteNamesConfig::default()
        };

        let summary = pull_remote_names(&repo, &peer, &config).unwrap();
        assert_eq!(summary.branches, 0);
        assert_eq!(summary.bookmarks, 1);
        assert!(!repo.metadata_path(&["remotenames", "branches"]).exists());
        assert!(repo.metadata_path(&["remotenames", "bookmarks"]).exists());
    }

    #[test]
    fn peer_failure_writes_nothing() {
        let (_dir, repo) = setup();
        let peer = InMemoryPeer::new(REMOTE)
            .with_bookmark("stable", Some(NodeId::hash(b"s")))
            .failing_branch_heads("connection reset");

        let err = pull_remote_names(&repo, &peer, &RemoteNamesConfig::default()).unwrap_err();
        assert!(matches!(err, SyncError::Peer(_)));
        assert!(!repo.metadata_path(&["remotenames"]).exists());
    }

    #[test]
    fn deleted_bookmark_is_not_recorded() {
        let (_dir, repo) = setup();
        let peer = InMemoryPeer::new(REMOTE)
            .with_bookmark("gone", None)
            .with_bookmark("kept", Some(NodeId::hash(b"k")));
        pull_remote_names(&repo, &peer, &RemoteNamesConfig::default()).unwrap();

        let names = load_remote_names(&repo, &RemoteNamesConfig::default()).unwrap();
        let bookmarks: &Bookmarks = &names[REMOTE].bookmarks;
        assert!(!bookmarks.contains_key("gone"));
        assert!(bookmarks.contains_key("kept"));
    }

    #[test]
    fn load_from_empty_repository() {
        let (_dir, repo) = setup();
        let names = load_remote_names(&repo, &RemoteNamesConfig::default()).unwrap();
        assert!(names.is_empty());
    }
}
