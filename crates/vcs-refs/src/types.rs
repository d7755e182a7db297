//! Core remote-name types.
//!
//! Remote names come in two kinds: branches, which may have several heads,
//! and bookmarks, which point at one changeset or were deleted remotely.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vcs_types::NodeId;

use crate::error::RefError;

/// Branch name to the heads the remote advertised for it, in order.
pub type BranchHeads = BTreeMap<String, Vec<NodeId>>;

/// Bookmark name to its target. `None` means the bookmark was deleted.
pub type Bookmarks = BTreeMap<String, Option<NodeId>>;

/// The kind of remote name stored in a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Bookmarks,
    Branches,
}

impl RefKind {
    /// Both kinds, in the order they are written during a sync.
    pub const ALL: [RefKind; 2] = [RefKind::Branches, RefKind::Bookmarks];

    /// The file name used for this kind.
    pub fn file_name(&self) -> &'static str {
        match self {
            RefKind::Bookmarks => "bookmarks",
            RefKind::Branches => "branches",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for RefKind {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bookmarks" => Ok(RefKind::Bookmarks),
            "branches" => Ok(RefKind::Branches),
            other => Err(RefError::InvalidName {
                name: other.to_string(),
                reason: "expected 'bookmarks' or 'branches'".into(),
            }),
        }
    }
}

/// The remote names of a single kind for one remote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "names", rename_all = "lowercase")]
pub enum RefTable {
    Branches(BranchHeads),
    Bookmarks(Bookmarks),
}

impl RefTable {
    /// An empty table of the given kind.
    pub fn empty(kind: RefKind) -> Self {
        match kind {
            RefKind::Branches => RefTable::Branches(BranchHeads::new()),
            RefKind::Bookmarks => RefTable::Bookmarks(Bookmarks::new()),
        }
    }

    pub fn kind(&self) -> RefKind {
        match self {
            RefTable::Branches(_) => RefKind::Branches,
            RefTable::Bookmarks(_) => RefKind::Bookmarks,
        }
    }

    /// Number of names in the table, including ones that produce no record.
    pub fn len(&self) -> usize {
        match self {
            RefTable::Branches(map) => map.len(),
            RefTable::Bookmarks(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(name, node)` pairs in the order they are written to disk.
    ///
    /// Branches yield one pair per head. Deleted bookmarks yield nothing.
    pub fn records(&self) -> Box<dyn Iterator<Item = (&str, &NodeId)> + '_> {
        match self {
            RefTable::Branches(map) => Box::new(
                map.iter()
                    .flat_map(|(name, heads)| heads.iter().map(move |h| (name.as_str(), h))),
            ),
            RefTable::Bookmarks(map) => Box::new(
                map.iter()
                    .filter_map(|(name, node)| node.as_ref().map(|n| (name.as_str(), n))),
            ),
        }
    }
}

/// Everything recorded about one remote.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRefs {
    pub branches: BranchHeads,
    pub bookmarks: Bookmarks,
}

impl RemoteRefs {
    /// Merge a table into this remote's entry, replacing names of that kind.
    pub fn absorb(&mut self, table: RefTable) {
        match table {
            RefTable::Branches(map) => self.branches = map,
            RefTable::Bookmarks(map) => self.bookmarks = map,
        }
    }
}

/// Remote names read back from disk, keyed by remote path.
pub type RemoteNames = BTreeMap<String, RemoteRefs>;
