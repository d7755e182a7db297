//! SQLite-backed persistent mappings for vcstate.
//!
//! A [`SqlMap`] is an ordered key→value container whose entries live in one
//! SQLite table. What the table looks like is described by a [`MapSchema`]:
//! its name, key column, value columns, DDL, and how a value is spread across
//! columns. The container operations themselves are written once, in
//! [`SqlMap`], and shared by every schema.
//!
//! # Schemas
//!
//! - [`DirstateSchema`] -- working-copy file state, four value columns
//! - [`CopySchema`] -- pending copies, one value column
//!
//! # Design Rules
//!
//! 1. Keys are unique; `set` is a single `INSERT OR REPLACE`.
//! 2. A missing key is [`MapError::KeyNotFound`], never a backend error.
//! 3. Backend errors are returned as-is in [`MapError::Backend`].
//! 4. Iterators page through the table in key order with a fresh cursor per
//!    page, so they never hold the connection between calls to `next`.

pub mod config;
pub mod copymap;
pub mod database;
pub mod dirstate;
pub mod error;
pub mod map;
pub mod schema;

pub use config::MapConfig;
pub use copymap::{CopyMap, CopySchema};
pub use database::Database;
pub use dirstate::{DirstateEntry, DirstateMap, DirstateSchema, EntryState};
pub use error::{MapError, MapResult};
pub use map::{Items, Keys, SqlMap};
pub use schema::MapSchema;
