//! The generic [`SqlMap`] container.

use std::borrow::Borrow;
use std::collections::{BTreeMap, VecDeque};
use std::fmt::{self, Display};
use std::marker::PhantomData;

use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::debug;

use crate::config::MapConfig;
use crate::database::Database;
use crate::error::{MapError, MapResult};
use crate::schema::MapSchema;

/// An ordered key→value container stored in one SQLite table.
///
/// Every operation is a single statement against the shared connection;
/// there is no transaction demarcation beyond SQLite's own per-statement
/// atomicity. Callers sharing a table across handles must serialize writes
/// themselves.
pub struct SqlMap<S: MapSchema> {
    db: Database,
    page_size: usize,
    _schema: PhantomData<fn() -> S>,
}

impl<S: MapSchema> fmt::Debug for SqlMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlMap")
            .field("table", &S::TABLE)
            .field("db", &self.db)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl<S: MapSchema> SqlMap<S> {
    /// Open the mapping, creating its table if needed.
    pub fn new(db: Database) -> MapResult<Self> {
        Self::with_config(db, &MapConfig::default())
    }

    /// Open the mapping with explicit tuning.
    pub fn with_config(db: Database, config: &MapConfig) -> MapResult<Self> {
        config.validate()?;
        db.with_conn(|conn| Ok(S::create_schema(conn)?))?;
        Ok(Self {
            db,
            page_size: config.page_size,
            _schema: PhantomData,
        })
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Look up the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> MapResult<S::Value>
    where
        S::Key: Borrow<Q>,
        Q: ToSql + Display + ?Sized,
    {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            value_list::<S>(),
            S::TABLE,
            S::KEY_COLUMN
        );
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            stmt.query_row(params![key], |row| S::row_to_value(row, 0))
                .optional()?
                .ok_or_else(|| MapError::KeyNotFound(key.to_string()))
        })
    }

    /// Look up `key`, falling back to `default` when it is absent.
    ///
    /// Backend errors are still returned.
    pub fn get_or<Q>(&self, key: &Q, default: S::Value) -> MapResult<S::Value>
    where
        S::Key: Borrow<Q>,
        Q: ToSql + Display + ?Sized,
    {
        match self.get(key) {
            Err(MapError::KeyNotFound(_)) => Ok(default),
            other => other,
        }
    }

    /// Returns `true` if `key` has a value.
    pub fn contains_key<Q>(&self, key: &Q) -> MapResult<bool>
    where
        S::Key: Borrow<Q>,
        Q: ToSql + ?Sized,
    {
        let sql = format!(
            "SELECT 1 FROM {} WHERE {} = ?1",
            S::TABLE,
            S::KEY_COLUMN
        );
        self.db.with_conn(|conn| {
            let found = conn
                .prepare_cached(&sql)?
                .query_row(params![key], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Insert or replace the value under `key` with one statement.
    pub fn set<Q>(&self, key: &Q, value: &S::Value) -> MapResult<()>
    where
        S::Key: Borrow<Q>,
        Q: ToSql + ?Sized,
    {
        let row = S::value_to_row(value);
        debug_assert_eq!(row.len(), S::VALUE_COLUMNS.len());

        let placeholders: Vec<String> = (1..=S::VALUE_COLUMNS.len() + 1)
            .map(|i| format!("?{i}"))
            .collect();
        let sql = format!(
            "INSERT OR REPLACE INTO {} ({}, {}) VALUES ({})",
            S::TABLE,
            S::KEY_COLUMN,
            value_list::<S>(),
            placeholders.join(", ")
        );
        let values = std::iter::once(&key as &dyn ToSql).chain(row.iter().map(|v| v as &dyn ToSql));

        self.db.with_conn(|conn| {
            conn.prepare_cached(&sql)?.execute(params_from_iter(values))?;
            Ok(())
        })
    }

    /// Remove `key`. Fails with [`MapError::KeyNotFound`] if it was absent.
    pub fn delete<Q>(&self, key: &Q) -> MapResult<()>
    where
        S::Key: Borrow<Q>,
        Q: ToSql + Display + ?Sized,
    {
        let sql = format!("DELETE FROM {} WHERE {} = ?1", S::TABLE, S::KEY_COLUMN);
        self.db.with_conn(|conn| {
            let changed = conn.prepare_cached(&sql)?.execute(params![key])?;
            if changed == 0 {
                return Err(MapError::KeyNotFound(key.to_string()));
            }
            Ok(())
        })
    }

    /// Number of entries.
    pub fn len(&self) -> MapResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", S::TABLE);
        self.db.with_conn(|conn| {
            let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }

    pub fn is_empty(&self) -> MapResult<bool> {
        Ok(self.len()? == 0)
    }

    /// All keys, in key order.
    pub fn keys(&self) -> MapResult<Vec<S::Key>> {
        let sql = format!(
            "SELECT {key} FROM {} ORDER BY {key}",
            S::TABLE,
            key = S::KEY_COLUMN
        );
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<S::Key>, _>>()?;
            Ok(keys)
        })
    }

    /// Lazily iterate keys in key order.
    ///
    /// Each call starts an independent pass over the current table contents.
    pub fn iter(&self) -> Keys<'_, S> {
        Keys {
            pager: Pager::new(self),
        }
    }

    /// Lazily iterate `(key, value)` pairs in key order.
    pub fn items(&self) -> Items<'_, S> {
        Items {
            pager: Pager::new(self),
        }
    }

    /// Remove every entry, keeping the table.
    pub fn clear(&self) -> MapResult<()> {
        let sql = format!("DELETE FROM {}", S::TABLE);
        self.db.with_conn(|conn| {
            let removed = conn.execute(&sql, [])?;
            debug!(table = S::TABLE, removed, "cleared map");
            Ok(())
        })
    }

    /// Materialize the whole mapping in memory.
    pub fn copy(&self) -> MapResult<BTreeMap<S::Key, S::Value>> {
        self.items().collect()
    }

    /// Drop the table. The map cannot be used afterwards.
    pub fn drop_schema(self) -> MapResult<()> {
        self.db.with_conn(|conn| Ok(S::drop_schema(conn)?))
    }

    /// Fetch up to `page_size` rows with keys strictly after `after`.
    fn fetch_page<T, F>(&self, columns: &str, after: Option<&S::Key>, read: F) -> MapResult<Vec<T>>
    where
        F: Fn(&Row<'_>) -> rusqlite::Result<T>,
    {
        let filter = if after.is_some() {
            format!("WHERE {} > ?1 ", S::KEY_COLUMN)
        } else {
            String::new()
        };
        let limit_param = if after.is_some() { "?2" } else { "?1" };
        let sql = format!(
            "SELECT {columns} FROM {} {filter}ORDER BY {} LIMIT {limit_param}",
            S::TABLE,
            S::KEY_COLUMN
        );
        let limit = self.page_size as i64;

        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            let rows = match after {
                Some(key) => stmt
                    .query_map(params![key, limit], &read)?
                    .collect::<rusqlite::Result<Vec<T>>>()?,
                None => stmt
                    .query_map(params![limit], &read)?
                    .collect::<rusqlite::Result<Vec<T>>>()?,
            };
            debug!(table = S::TABLE, rows = rows.len(), "fetched page");
            Ok(rows)
        })
    }
}

fn value_list<S: MapSchema>() -> String {
    S::VALUE_COLUMNS.join(", ")
}

/// Paging state shared by [`Keys`] and [`Items`].
struct Pager<'a, S: MapSchema, T> {
    map: &'a SqlMap<S>,
    buffer: VecDeque<T>,
    last: Option<S::Key>,
    done: bool,
}

impl<'a, S: MapSchema, T> Pager<'a, S, T> {
    fn new(map: &'a SqlMap<S>) -> Self {
        Self {
            map,
            buffer: VecDeque::new(),
            last: None,
            done: false,
        }
    }

    fn next_with<F, K>(&mut self, fetch: F, key_of: K) -> Option<MapResult<T>>
    where
        F: FnOnce(&SqlMap<S>, Option<&S::Key>) -> MapResult<Vec<T>>,
        K: Fn(&T) -> &S::Key,
    {
        if self.buffer.is_empty() && !self.done {
            match fetch(self.map, self.last.as_ref()) {
                Ok(rows) => {
                    if rows.len() < self.map.page_size {
                        self.done = true;
                    }
                    if let Some(last) = rows.last() {
                        self.last = Some(key_of(last).clone());
                    }
                    self.buffer.extend(rows);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

/// Lazy iterator over the keys of a [`SqlMap`].
pub struct Keys<'a, S: MapSchema> {
    pager: Pager<'a, S, S::Key>,
}

impl<S: MapSchema> Iterator for Keys<'_, S> {
    type Item = MapResult<S::Key>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pager.next_with(
            |map, after| map.fetch_page(S::KEY_COLUMN, after, |row| row.get(0)),
            |key| key,
        )
    }
}

/// Lazy iterator over the `(key, value)` pairs of a [`SqlMap`].
pub struct Items<'a, S: MapSchema> {
    pager: Pager<'a, S, (S::Key, S::Value)>,
}

impl<S: MapSchema> Iterator for Items<'_, S> {
    type Item = MapResult<(S::Key, S::Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pager.next_with(
            |map, after| {
                let columns = format!("{}, {}", S::KEY_COLUMN, value_list::<S>());
                map.fetch_page(&columns, after, |row| {
                    Ok((row.get(0)?, S::row_to_value(row, 1)?))
                })
            },
            |(key, _)| key,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copymap::{CopyMap, CopySchema};

    fn copymap() -> CopyMap {
        CopyMap::new(Database::in_memory().unwrap()).unwrap()
    }

    fn small_pages() -> CopyMap {
        let config = MapConfig { page_size: 2 };
        CopyMap::with_config(Database::in_memory().unwrap(), &config).unwrap()
    }

    #[test]
    fn set_then_get() {
        let map = copymap();
        map.set("b.txt", &"a.txt".to_string()).unwrap();
        assert_eq!(map.get("b.txt").unwrap(), "a.txt");
    }

    #[test]
    fn set_twice_keeps_last_value() {
        let map = copymap();
        map.set("k", &"v".to_string()).unwrap();
        map.set("k", &"v2".to_string()).unwrap();
        assert_eq!(map.get("k").unwrap(), "v2");
        assert_eq!(map.len().unwrap(), 1);
    }

    #[test]
    fn get_missing_is_key_not_found() {
        let map = copymap();
        let err = map.get("nope").unwrap_err();
        assert!(err.is_key_not_found());
        assert!(matches!(err, MapError::KeyNotFound(k) if k == "nope"));
    }

    #[test]
    fn get_or_default() {
        let map = copymap();
        assert_eq!(map.get_or("nope", "fallback".into()).unwrap(), "fallback");
        map.set("yes", &"real".to_string()).unwrap();
        assert_eq!(map.get_or("yes", "fallback".into()).unwrap(), "real");
    }

    #[test]
    fn delete_present_and_absent() {
        let map = copymap();
        map.set("k", &"v".to_string()).unwrap();
        map.delete("k").unwrap();
        assert!(!map.contains_key("k").unwrap());

        let err = map.delete("k").unwrap_err();
        assert!(err.is_key_not_found());
    }

    #[test]
    fn len_counts_distinct_keys_minus_deleted() {
        let map = copymap();
        for key in ["a", "b", "c", "a", "d"] {
            map.set(key, &"src".to_string()).unwrap();
        }
        map.delete("c").unwrap();
        assert_eq!(map.len().unwrap(), 3);
        assert!(!map.is_empty().unwrap());
    }

    #[test]
    fn keys_are_ordered() {
        let map = copymap();
        for key in ["zeta", "alpha", "mid"] {
            map.set(key, &"src".to_string()).unwrap();
        }
        assert_eq!(map.keys().unwrap(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn iter_spans_multiple_pages() {
        let map = small_pages();
        for i in 0..5 {
            map.set(&format!("f{i}"), &format!("s{i}")).unwrap();
        }
        let keys: Vec<String> = map.iter().collect::<MapResult<_>>().unwrap();
        assert_eq!(keys, vec!["f0", "f1", "f2", "f3", "f4"]);
    }

    #[test]
    fn iter_exact_page_multiple() {
        let map = small_pages();
        for i in 0..4 {
            map.set(&format!("f{i}"), &"s".to_string()).unwrap();
        }
        assert_eq!(map.iter().count(), 4);
    }

    #[test]
    fn iter_is_restartable() {
        let map = small_pages();
        for i in 0..3 {
            map.set(&format!("f{i}"), &"s".to_string()).unwrap();
        }
        let mut first = map.iter();
        assert_eq!(first.next().unwrap().unwrap(), "f0");

        let second: Vec<String> = map.iter().map(Result::unwrap).collect();
        assert_eq!(second.len(), 3);

        let rest: Vec<String> = first.map(Result::unwrap).collect();
        assert_eq!(rest, vec!["f1", "f2"]);
    }

    #[test]
    fn items_pair_keys_with_values() {
        let map = small_pages();
        map.set("b", &"from-b".to_string()).unwrap();
        map.set("a", &"from-a".to_string()).unwrap();
        map.set("c", &"from-c".to_string()).unwrap();

        let items: Vec<(String, String)> = map.items().collect::<MapResult<_>>().unwrap();
        assert_eq!(
            items,
            vec![
                ("a".to_string(), "from-a".to_string()),
                ("b".to_string(), "from-b".to_string()),
                ("c".to_string(), "from-c".to_string()),
            ]
        );
    }

    #[test]
    fn empty_map_iterates_nothing() {
        let map = copymap();
        assert!(map.iter().next().is_none());
        assert!(map.items().next().is_none());
        assert!(map.is_empty().unwrap());
    }

    #[test]
    fn clear_removes_everything() {
        let map = copymap();
        map.set("a", &"x".to_string()).unwrap();
        map.set("b", &"y".to_string()).unwrap();
        map.clear().unwrap();
        assert_eq!(map.len().unwrap(), 0);
        assert!(map.keys().unwrap().is_empty());
    }

    #[test]
    fn copy_materializes() {
        let map = copymap();
        map.set("a", &"x".to_string()).unwrap();
        map.set("b", &"y".to_string()).unwrap();
        let copy = map.copy().unwrap();
        assert_eq!(copy.len(), 2);
        assert_eq!(copy["a"], "x");

        // The copy is detached from the table.
        map.delete("a").unwrap();
        assert_eq!(copy["a"], "x");
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let first = CopyMap::new(db.clone()).unwrap();
        first.set("a", &"x".to_string()).unwrap();

        let second = CopyMap::new(db).unwrap();
        assert_eq!(second.get("a").unwrap(), "x");
    }

    #[test]
    fn drop_schema_removes_table() {
        let db = Database::in_memory().unwrap();
        let map = CopyMap::new(db.clone()).unwrap();
        assert!(db.table_names().unwrap().contains(&CopySchema::TABLE.to_string()));

        map.drop_schema().unwrap();
        assert!(!db.table_names().unwrap().contains(&CopySchema::TABLE.to_string()));
    }

    #[test]
    fn backend_errors_pass_through() {
        let db = Database::in_memory().unwrap();
        let map = CopyMap::new(db.clone()).unwrap();
        db.with_conn(|conn| Ok(conn.execute_batch("DROP TABLE copymap")?))
            .unwrap();

        let err = map.get("a").unwrap_err();
        assert!(matches!(err, MapError::Backend(_)), "got {err}");
        assert!(!err.is_key_not_found());
    }

    #[test]
    fn zero_page_size_rejected() {
        let config = MapConfig { page_size: 0 };
        let err = CopyMap::with_config(Database::in_memory().unwrap(), &config).unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig(_)));
    }
}
