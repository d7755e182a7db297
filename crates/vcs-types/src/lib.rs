//! Foundation types for vcstate.
//!
//! Every other vcstate crate depends on `vcs-types` for the identifier of a
//! changeset.
//!
//! # Key Types
//!
//! - [`NodeId`] - Content-derived 20-byte changeset identifier, rendered as
//!   40 lowercase hex characters
//! - [`TypeError`] - Parse failures for the types above

pub mod error;
pub mod node;

pub use error::TypeError;
pub use node::NodeId;
