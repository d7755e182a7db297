use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::info;

use crate::error::MapResult;

/// Applied to every connection before any mapping touches it.
pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;

/// Shared SQLite connection handle.
///
/// Statements are serialized through a `parking_lot::Mutex`; clones share
/// the same connection. Tables are created by the mappings that use them,
/// not here.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> MapResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(PRAGMAS)?;

        info!(path = %path.display(), "database opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_owned(),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> MapResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(PRAGMAS)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        })
    }

    /// Execute a closure with the database connection.
    pub fn with_conn<F, T>(&self, f: F) -> MapResult<T>
    where
        F: FnOnce(&Connection) -> MapResult<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all tables currently in the database.
    pub fn table_names(&self) -> MapResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            path: self.path.clone(),
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.path(), Path::new(":memory:"));
        assert!(db.table_names().unwrap().is_empty());
    }

    #[test]
    fn open_file_database_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dirstate.sqlite");
        let db = Database::open(&path).unwrap();
        assert!(path.exists());

        let db2 = Database::open(&path).unwrap();
        drop(db);
        drop(db2);
    }

    #[test]
    fn clones_share_connection() {
        let db = Database::in_memory().unwrap();
        let other = db.clone();
        db.with_conn(|conn| {
            conn.execute_batch("CREATE TABLE t (x INTEGER)")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(other.table_names().unwrap(), vec!["t"]);
    }

    #[test]
    fn wal_mode_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("db.sqlite")).unwrap();
        let mode: String = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(mode, "wal");
    }
}
