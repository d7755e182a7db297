use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vcs_refs::{BranchHeads, Bookmarks};

/// What to persist for one remote. `None` leaves that kind's file alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveRequest {
    pub remote: String,
    pub branches: Option<BranchHeads>,
    pub bookmarks: Option<Bookmarks>,
}

impl SaveRequest {
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            ..Self::default()
        }
    }

    pub fn with_branches(mut self, branches: BranchHeads) -> Self {
        self.branches = Some(branches);
        self
    }

    pub fn with_bookmarks(mut self, bookmarks: Bookmarks) -> Self {
        self.bookmarks = Some(bookmarks);
        self
    }
}

/// Files rewritten by one save, in write order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub written: Vec<PathBuf>,
}

/// Outcome of a pull-time refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullSummary {
    pub remote: String,
    pub branches: usize,
    pub bookmarks: usize,
    /// Heads the peer advertised that were unknown locally or obsolete.
    pub dropped_heads: usize,
}
