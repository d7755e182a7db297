//! Working-copy file state: tracked path → (state, mode, size, mtime).

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::error::MapResult;
use crate::map::SqlMap;
use crate::schema::MapSchema;

/// Tracking state of a file in the working copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryState {
    /// Tracked and unchanged since the last status check (`n`).
    Normal,
    /// Scheduled for addition (`a`).
    Added,
    /// Scheduled for removal (`r`).
    Removed,
    /// Needs merging (`m`).
    Merged,
}

impl EntryState {
    pub fn as_char(&self) -> char {
        match self {
            EntryState::Normal => 'n',
            EntryState::Added => 'a',
            EntryState::Removed => 'r',
            EntryState::Merged => 'm',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(EntryState::Normal),
            'a' => Some(EntryState::Added),
            'r' => Some(EntryState::Removed),
            'm' => Some(EntryState::Merged),
            _ => None,
        }
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown dirstate status {0:?}")]
struct UnknownStatus(String);

impl FromSql for EntryState {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        let mut chars = raw.chars();
        match (chars.next().and_then(EntryState::from_char), chars.next()) {
            (Some(state), None) => Ok(state),
            _ => Err(FromSqlError::Other(Box::new(UnknownStatus(raw.to_string())))),
        }
    }
}

/// One tracked file.
///
/// `size` and `mtime` use `-1` for "unknown, must re-check"; `size` uses
/// `-2` for a file taken from the other merge parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirstateEntry {
    pub state: EntryState,
    pub mode: i32,
    pub size: i32,
    pub mtime: i32,
}

impl DirstateEntry {
    pub fn new(state: EntryState, mode: i32, size: i32, mtime: i32) -> Self {
        Self {
            state,
            mode,
            size,
            mtime,
        }
    }

    /// Whether a status check has to look at this file again.
    pub fn is_non_normal(&self) -> bool {
        self.state != EntryState::Normal || self.mtime == -1
    }
}

/// Four-column schema for working-copy file state.
#[derive(Debug)]
pub struct DirstateSchema;

impl MapSchema for DirstateSchema {
    type Key = String;
    type Value = DirstateEntry;

    const TABLE: &'static str = "files";
    const KEY_COLUMN: &'static str = "filename";
    const VALUE_COLUMNS: &'static [&'static str] = &["status", "mode", "size", "mtime"];

    fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS files (
                filename TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                mode INTEGER NOT NULL,
                size INTEGER NOT NULL,
                mtime INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_files_status ON files(status);",
        )
    }

    fn drop_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "DROP INDEX IF EXISTS idx_files_status;
            DROP TABLE IF EXISTS files;",
        )
    }

    fn row_to_value(row: &Row<'_>, offset: usize) -> rusqlite::Result<DirstateEntry> {
        Ok(DirstateEntry {
            state: row.get(offset)?,
            mode: row.get(offset + 1)?,
            size: row.get(offset + 2)?,
            mtime: row.get(offset + 3)?,
        })
    }

    fn value_to_row(value: &DirstateEntry) -> Vec<Value> {
        vec![
            Value::Text(value.state.as_char().to_string()),
            Value::Integer(value.mode.into()),
            Value::Integer(value.size.into()),
            Value::Integer(value.mtime.into()),
        ]
    }
}

/// Working-copy file state stored in SQLite.
pub type DirstateMap = SqlMap<DirstateSchema>;

impl SqlMap<DirstateSchema> {
    /// Paths whose entry is not in the normal state or has an unknown mtime.
    pub fn non_normal(&self) -> MapResult<Vec<String>> {
        self.database().with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT filename FROM files WHERE status != 'n' OR mtime = -1 ORDER BY filename",
            )?;
            let paths = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(paths)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::error::MapError;

    fn dirstate() -> DirstateMap {
        DirstateMap::new(Database::in_memory().unwrap()).unwrap()
    }

    #[test]
    fn state_chars_roundtrip() {
        for state in [
            EntryState::Normal,
            EntryState::Added,
            EntryState::Removed,
            EntryState::Merged,
        ] {
            assert_eq!(EntryState::from_char(state.as_char()), Some(state));
        }
        assert_eq!(EntryState::from_char('x'), None);
    }

    #[test]
    fn composite_value_spread_across_columns() {
        let map = dirstate();
        let entry = DirstateEntry::new(EntryState::Normal, 0o644, 120, 1_700_000_000);
        map.set("src/lib.rs", &entry).unwrap();
        assert_eq!(map.get("src/lib.rs").unwrap(), entry);

        let (status, size): (String, i64) = map
            .database()
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT status, size FROM files WHERE filename = 'src/lib.rs'",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?)
            })
            .unwrap();
        assert_eq!(status, "n");
        assert_eq!(size, 120);
    }

    #[test]
    fn update_replaces_all_columns() {
        let map = dirstate();
        map.set("a", &DirstateEntry::new(EntryState::Added, 0o644, -1, -1))
            .unwrap();
        let normal = DirstateEntry::new(EntryState::Normal, 0o755, 10, 42);
        map.set("a", &normal).unwrap();
        assert_eq!(map.get("a").unwrap(), normal);
        assert_eq!(map.len().unwrap(), 1);
    }

    #[test]
    fn non_normal_lists_pending_files() {
        let map = dirstate();
        map.set("clean", &DirstateEntry::new(EntryState::Normal, 0o644, 1, 5))
            .unwrap();
        map.set("added", &DirstateEntry::new(EntryState::Added, 0o644, -1, -1))
            .unwrap();
        map.set("lookup", &DirstateEntry::new(EntryState::Normal, 0o644, 1, -1))
            .unwrap();
        map.set("removed", &DirstateEntry::new(EntryState::Removed, 0, 0, 0))
            .unwrap();

        assert_eq!(map.non_normal().unwrap(), vec!["added", "lookup", "removed"]);
        let from_entries: Vec<String> = map
            .items()
            .map(Result::unwrap)
            .filter(|(_, e)| e.is_non_normal())
            .map(|(k, _)| k)
            .collect();
        assert_eq!(from_entries, map.non_normal().unwrap());
    }

    #[test]
    fn unknown_status_is_backend_error() {
        let map = dirstate();
        map.database()
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO files VALUES ('weird', 'z', 0, 0, 0)",
                    [],
                )?;
                Ok(())
            })
            .unwrap();
        let err = map.get("weird").unwrap_err();
        assert!(matches!(err, MapError::Backend(_)), "got {err}");
    }

    #[test]
    fn copy_materializes_entries() {
        let map = dirstate();
        let entry = DirstateEntry::new(EntryState::Merged, 0o644, -2, -1);
        map.set("merged.txt", &entry).unwrap();
        let copy = map.copy().unwrap();
        assert_eq!(copy.get("merged.txt"), Some(&entry));
    }
}
