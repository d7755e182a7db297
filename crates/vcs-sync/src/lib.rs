//! Remote name synchronization for vcstate.
//!
//! On pull or clone, [`pull_remote_names`] takes the bookmarks and branch
//! heads a peer advertised, drops heads that are unknown locally or obsolete,
//! and hands the result to [`save_remote_names`], which rewrites the
//! remote-name files while holding the repository's write lock.
//!
//! The repository and the peer are collaborators reached only through the
//! [`LocalRepository`] and [`Peer`] traits. Reading and writing names needs
//! only the [`MetadataStore`] half, which [`MetadataDir`] provides for a
//! directory on disk. [`memory`] provides in-memory implementations for
//! tests and embedding.

pub mod config;
pub mod error;
pub mod lock;
pub mod memory;
pub mod metadata;
pub mod pull;
pub mod traits;
pub mod types;
pub mod writer;

pub use config::RemoteNamesConfig;
pub use error::{SyncError, SyncResult};
pub use lock::WriteLock;
pub use memory::{InMemoryPeer, InMemoryRepository};
pub use metadata::{MetadataDir, LOCK_FILE};
pub use pull::{filter_heads, load_remote_names, pull_remote_names};
pub use traits::{LocalRepository, MetadataStore, Peer};
pub use types::{PullSummary, SaveReport, SaveRequest};
pub use writer::save_remote_names;
