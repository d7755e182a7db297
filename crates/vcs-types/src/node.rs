use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of a node identifier in bytes.
pub const NODE_LEN: usize = 20;

/// Length of a node identifier in hex characters.
pub const HEX_LEN: usize = NODE_LEN * 2;

/// Identifier of a changeset.
///
/// A `NodeId` is a fixed-length hash derived from changeset content. On disk
/// and on the wire it is always the 40-character lowercase hex encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId([u8; NODE_LEN]);

impl NodeId {
    /// Derive a `NodeId` from content bytes.
    pub fn hash(data: &[u8]) -> Self {
        let mut out = [0u8; NODE_LEN];
        let mut hasher = blake3::Hasher::new();
        hasher.update(data);
        hasher.finalize_xof().fill(&mut out);
        Self(out)
    }

    /// Wrap a pre-computed hash.
    pub const fn from_raw(bytes: [u8; NODE_LEN]) -> Self {
        Self(bytes)
    }

    /// The null node (all zeros). Represents "no changeset".
    pub const fn null() -> Self {
        Self([0u8; NODE_LEN])
    }

    /// Returns `true` if this is the null node.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; NODE_LEN]
    }

    /// Full 40-character hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 12 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..6])
    }

    /// Parse a 40-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: HEX_LEN,
                actual: s.len(),
            });
        }
        let mut arr = [0u8; NODE_LEN];
        hex::decode_to_slice(s, &mut arr).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.short_hex())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for NodeId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_hex()
    }
}
