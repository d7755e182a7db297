//! Pending copies in the working copy: destination path → source path.

use rusqlite::types::Value;
use rusqlite::{Connection, Row};

use crate::map::SqlMap;
use crate::schema::MapSchema;

/// Single-column schema for the copy map.
#[derive(Debug)]
pub struct CopySchema;

impl MapSchema for CopySchema {
    type Key = String;
    type Value = String;

    const TABLE: &'static str = "copymap";
    const KEY_COLUMN: &'static str = "dest";
    const VALUE_COLUMNS: &'static [&'static str] = &["source"];

    fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS copymap (
                dest TEXT PRIMARY KEY,
                source TEXT NOT NULL
            );",
        )
    }

    fn drop_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch("DROP TABLE IF EXISTS copymap;")
    }

    fn row_to_value(row: &Row<'_>, offset: usize) -> rusqlite::Result<String> {
        row.get(offset)
    }

    fn value_to_row(value: &String) -> Vec<Value> {
        vec![Value::Text(value.clone())]
    }
}

/// Copy map stored in SQLite.
pub type CopyMap = SqlMap<CopySchema>;
