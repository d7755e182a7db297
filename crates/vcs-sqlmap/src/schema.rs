//! The [`MapSchema`] trait describing how a mapping is laid out in SQLite.

use std::fmt::Display;

use rusqlite::types::{FromSql, ToSql, Value};
use rusqlite::{Connection, Row};

/// Table layout and row conversion for one kind of mapping.
///
/// A schema is a zero-sized marker type. Everything [`SqlMap`](crate::SqlMap)
/// does is derived from these items:
///
/// - [`TABLE`](Self::TABLE), [`KEY_COLUMN`](Self::KEY_COLUMN) and
///   [`VALUE_COLUMNS`](Self::VALUE_COLUMNS) name the table and its columns.
/// - [`create_schema`](Self::create_schema) must be idempotent; it runs every
///   time a map is constructed.
/// - [`row_to_value`](Self::row_to_value) reads the value columns starting at
///   `offset`, in `VALUE_COLUMNS` order.
/// - [`value_to_row`](Self::value_to_row) returns exactly one SQL value per
///   entry of `VALUE_COLUMNS`, in the same order.
pub trait MapSchema {
    type Key: ToSql + FromSql + Ord + Clone + Display;
    type Value;

    const TABLE: &'static str;
    const KEY_COLUMN: &'static str;
    const VALUE_COLUMNS: &'static [&'static str];

    /// Create the table if it does not exist.
    fn create_schema(conn: &Connection) -> rusqlite::Result<()>;

    /// Drop the table and everything in it.
    fn drop_schema(conn: &Connection) -> rusqlite::Result<()>;

    /// Rebuild a value from the columns at `offset..offset + VALUE_COLUMNS.len()`.
    fn row_to_value(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self::Value>;

    /// Spread a value across the value columns.
    fn value_to_row(value: &Self::Value) -> Vec<Value>;
}
