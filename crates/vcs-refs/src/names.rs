//! Validation of bookmark names, branch names, and remote paths.
//!
//! The file format separates fields with NUL and records with a newline, so
//! neither byte may appear inside a field. Everything else is accepted:
//! branch and bookmark names are free-form text chosen by users.
//!
//! - Must be non-empty
//! - Must not contain `\0`
//! - Must not contain `\n` or `\r`

use crate::error::{RefError, Result};

/// Bytes that would break record framing.
const FORBIDDEN_CHARS: &[char] = &['\0', '\n', '\r'];

/// Validate a bookmark or branch name, returning `Ok(())` if it can be stored.
///
/// # Examples
///
/// ```
/// use vcs_refs::names::validate_name;
///
/// assert!(validate_name("default").is_ok());
/// assert!(validate_name("release 1.0").is_ok());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("bad\0name").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<()> {
    check(name, "name")
}

/// Validate a remote path (URL or peer identifier).
pub fn validate_remote_path(path: &str) -> Result<()> {
    check(path, "remote path")
}

fn check(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RefError::InvalidName {
            name: value.to_string(),
            reason: format!("{what} must not be empty"),
        });
    }

    if let Some(ch) = value.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(RefError::InvalidName {
            name: value.to_string(),
            reason: format!("{what} contains forbidden character: {ch:?}"),
        });
    }

    Ok(())
}
