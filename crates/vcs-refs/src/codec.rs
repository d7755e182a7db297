//! Byte-level encoding of a remote-name file.
//!
//! On-disk format:
//! ```text
//! [version line: "0"]
//! [blank line]
//! [record: <40 hex chars> NUL <remote path> NUL <name> LF] *
//! ```

use std::collections::BTreeMap;

use vcs_types::NodeId;

use crate::error::{RefError, Result};
use crate::names::{validate_name, validate_remote_path};
use crate::types::{RefKind, RefTable};

/// Storage format version written at the top of every file.
pub const FORMAT_VERSION: u32 = 0;

/// Field separator inside a record.
const SEP: char = '\0';

/// Encode one remote's names of a single kind.
///
/// Records are ordered by name. A branch yields one record per head; a
/// deleted bookmark yields none. Names are validated before any byte is
/// produced, but only those that end up in a record: a deleted bookmark or
/// a branch without heads is never checked.
pub fn encode(remote: &str, table: &RefTable) -> Result<Vec<u8>> {
    validate_remote_path(remote)?;
    table
        .records()
        .try_for_each(|(name, _)| validate_name(name))?;

    let mut out = format!("{FORMAT_VERSION}\n\n");
    for (name, node) in table.records() {
        out.push_str(&node.to_hex());
        out.push(SEP);
        out.push_str(remote);
        out.push(SEP);
        out.push_str(name);
        out.push('\n');
    }
    Ok(out.into_bytes())
}

/// Decode a remote-name file of the given kind, grouping records by remote.
///
/// Heads of a branch accumulate in file order. A bookmark name that appears
/// more than once keeps its last record.
pub fn decode(kind: RefKind, data: &[u8]) -> Result<BTreeMap<String, RefTable>> {
    let text = std::str::from_utf8(data).map_err(|e| RefError::CorruptFormat {
        line: 1,
        reason: format!("not valid UTF-8: {e}"),
    })?;

    let mut lines = text.split('\n').enumerate();
    let version_line = match lines.next() {
        Some((_, line)) if !line.is_empty() => line,
        _ => {
            return Err(RefError::CorruptFormat {
                line: 1,
                reason: "missing version line".into(),
            })
        }
    };
    let version: u32 = version_line
        .trim()
        .parse()
        .map_err(|_| RefError::CorruptFormat {
            line: 1,
            reason: format!("unreadable version marker {version_line:?}"),
        })?;
    if version != FORMAT_VERSION {
        return Err(RefError::UnsupportedVersion(version));
    }

    let mut result: BTreeMap<String, RefTable> = BTreeMap::new();
    for (idx, line) in lines {
        if line.is_empty() {
            continue;
        }
        let (node, remote, name) = parse_record(idx + 1, line)?;
        let table = result
            .entry(remote.to_string())
            .or_insert_with(|| RefTable::empty(kind));
        match table {
            RefTable::Branches(map) => map.entry(name.to_string()).or_default().push(node),
            RefTable::Bookmarks(map) => {
                map.insert(name.to_string(), Some(node));
            }
        }
    }
    Ok(result)
}

fn parse_record(line_no: usize, line: &str) -> Result<(NodeId, &str, &str)> {
    let fields: Vec<&str> = line.split(SEP).collect();
    let [hex, remote, name] = fields.as_slice() else {
        return Err(RefError::CorruptFormat {
            line: line_no,
            reason: format!("expected 3 fields, found {}", fields.len()),
        });
    };

    let node = NodeId::from_hex(hex).map_err(|e| RefError::CorruptFormat {
        line: line_no,
        reason: format!("bad node {hex:?}: {e}"),
    })?;
    if remote.is_empty() || name.is_empty() {
        return Err(RefError::CorruptFormat {
            line: line_no,
            reason: "empty remote path or name".into(),
        });
    }
    Ok((node, *remote, *name))
}
