//! Remote name storage for vcstate.
//!
//! During a pull or clone the client records which bookmarks and branch heads
//! the remote advertised. Those "remote names" live in two plain-text files
//! under the repository's metadata directory, one per [`RefKind`]:
//!
//! ```text
//! 0\n
//! \n
//! <hex-node>\0<remote-path>\0<name>\n
//! ...
//! ```
//!
//! The leading `0` is the storage format version. Records are sorted by name
//! so the same input always produces the same bytes, and every write replaces
//! the whole file atomically.
//!
//! # Modules
//!
//! - [`error`] - Error types for codec and file operations
//! - [`types`] - [`RefKind`], [`RefTable`], [`RemoteRefs`], [`RemoteNames`]
//! - [`names`] - Validation of names and remote paths
//! - [`codec`] - Byte-level encode/decode of one remote-name file
//! - [`atomic`] - [`AtomicFile`], temp-file-then-rename writes
//! - [`file`] - Reading and writing remote-name files on disk

pub mod atomic;
pub mod codec;
pub mod error;
pub mod file;
pub mod names;
pub mod types;

pub use atomic::AtomicFile;
pub use codec::{decode, encode, FORMAT_VERSION};
pub use error::{RefError, Result};
pub use file::{read_file, write_file};
pub use names::{validate_name, validate_remote_path};
pub use types::{BranchHeads, Bookmarks, RefKind, RefTable, RemoteNames, RemoteRefs};
