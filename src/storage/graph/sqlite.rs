//! `SQLite` atom store.
//!
//! Persists atoms keyed by their content handle. Because the primary key is
//! the handle, `INSERT OR IGNORE` gives the deduplication contract directly.

// SQLite returns i64 for counts and numbers; both are non-negative here.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

use super::{check_link_type, check_node_type};
use crate::models::{Atom, AtomType, Handle};
use crate::storage::traits::graph::{AtomStore, StoreStats};
use crate::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::instrument;

/// Helper to acquire mutex lock with poison recovery.
fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("Atom store SQLite mutex was poisoned, recovering");
            metrics::counter!("linkgraph_sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}

fn sql_error(operation: &str) -> impl FnOnce(rusqlite::Error) -> Error + '_ {
    move |e| Error::operation(operation, e)
}

/// Raw row: type name, node name, outgoing JSON.
type AtomRow = (String, Option<String>, Option<String>);

/// `SQLite`-based atom store.
///
/// # Concurrency Model
///
/// Uses a `Mutex<Connection>` for thread-safe access. Every insert runs under
/// the mutex, which serializes concurrent inserts of the same handle.
///
/// # Schema
///
/// - `atoms`: one row per atom, keyed by hex handle
/// - `atom_outgoing`: one row per (link, position), indexed by target for
///   incoming-set queries
pub struct SqliteAtomStore {
    /// Connection to the `SQLite` database.
    conn: Mutex<Connection>,
    /// Path to the database (None for in-memory).
    db_path: Option<PathBuf>,
}

impl SqliteAtomStore {
    /// Opens (or creates) an atom store at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::operation("create_store_dir", e))?;
        }
        let conn = Connection::open(&db_path).map_err(sql_error("open_atom_sqlite"))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Creates an in-memory `SQLite` store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(sql_error("open_atom_sqlite_memory"))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Returns the database path.
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Initializes the database schema.
    fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);

        // Pragmas are best-effort; in-memory databases reject WAL.
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");
        let _ = conn.pragma_update(None, "busy_timeout", "5000");
        let _ = conn.pragma_update(None, "foreign_keys", "ON");

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS atoms (
                handle TEXT PRIMARY KEY,
                atom_type TEXT NOT NULL,
                name TEXT,
                outgoing TEXT
            );
            CREATE TABLE IF NOT EXISTS atom_outgoing (
                link TEXT NOT NULL,
                position INTEGER NOT NULL,
                target TEXT NOT NULL,
                PRIMARY KEY (link, position),
                FOREIGN KEY (link) REFERENCES atoms(handle),
                FOREIGN KEY (target) REFERENCES atoms(handle)
            );
            CREATE INDEX IF NOT EXISTS idx_atoms_type ON atoms(atom_type);
            CREATE INDEX IF NOT EXISTS idx_atom_outgoing_target ON atom_outgoing(target);",
        )
        .map_err(sql_error("create_atom_tables"))
    }

    fn row_to_atom(row: AtomRow) -> Result<Atom> {
        let (type_name, name, outgoing) = row;
        let atom_type = AtomType::parse(&type_name).ok_or_else(|| {
            Error::operation("decode_atom", format!("unknown atom type '{type_name}'"))
        })?;

        if atom_type.is_node() {
            return Ok(Atom::node(atom_type, name.unwrap_or_default()));
        }

        let outgoing: Vec<Handle> = match outgoing {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| Error::operation("decode_atom", e))?
            },
            None => Vec::new(),
        };
        Ok(Atom::link(atom_type, outgoing))
    }

    fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AtomRow> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    }
}

impl AtomStore for SqliteAtomStore {
    #[instrument(skip(self), level = "trace")]
    fn insert_node(&self, atom_type: AtomType, name: &str) -> Result<Handle> {
        check_node_type(atom_type)?;
        let handle = Handle::for_node(atom_type, name);

        let conn = acquire_lock(&self.conn);
        conn.execute(
            "INSERT OR IGNORE INTO atoms (handle, atom_type, name, outgoing) VALUES (?1, ?2, ?3, NULL)",
            params![handle.to_hex(), atom_type.as_str(), name],
        )
        .map_err(sql_error("insert_node"))?;
        Ok(handle)
    }

    #[instrument(skip(self, outgoing), fields(arity = outgoing.len()), level = "trace")]
    fn insert_link(&self, atom_type: AtomType, outgoing: &[Handle]) -> Result<Handle> {
        check_link_type(atom_type)?;
        let handle = Handle::for_link(atom_type, outgoing);
        let hex = handle.to_hex();

        let mut conn = acquire_lock(&self.conn);
        let tx = conn.transaction().map_err(sql_error("insert_link"))?;

        let exists: bool = tx
            .query_row("SELECT 1 FROM atoms WHERE handle = ?1", params![hex], |_| {
                Ok(true)
            })
            .optional()
            .map_err(sql_error("insert_link"))?
            .unwrap_or(false);
        if exists {
            return Ok(handle);
        }

        for target in outgoing {
            let found: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM atoms WHERE handle = ?1",
                    params![target.to_hex()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(sql_error("insert_link"))?;
            if found.is_none() {
                return Err(Error::InvalidInput(format!(
                    "{atom_type} references unknown atom {target}"
                )));
            }
        }

        let outgoing_json =
            serde_json::to_string(outgoing).map_err(|e| Error::operation("insert_link", e))?;
        tx.execute(
            "INSERT INTO atoms (handle, atom_type, name, outgoing) VALUES (?1, ?2, NULL, ?3)",
            params![hex, atom_type.as_str(), outgoing_json],
        )
        .map_err(sql_error("insert_link"))?;

        for (position, target) in outgoing.iter().enumerate() {
            tx.execute(
                "INSERT INTO atom_outgoing (link, position, target) VALUES (?1, ?2, ?3)",
                params![hex, position as i64, target.to_hex()],
            )
            .map_err(sql_error("insert_link"))?;
        }

        tx.commit().map_err(sql_error("insert_link"))?;
        Ok(handle)
    }

    fn get_atom(&self, handle: &Handle) -> Result<Option<Atom>> {
        let conn = acquire_lock(&self.conn);
        let row = conn
            .query_row(
                "SELECT atom_type, name, outgoing FROM atoms WHERE handle = ?1",
                params![handle.to_hex()],
                Self::read_row,
            )
            .optional()
            .map_err(sql_error("get_atom"))?;
        row.map(Self::row_to_atom).transpose()
    }

    fn atoms_of_type(&self, atom_type: AtomType) -> Result<Vec<Atom>> {
        let conn = acquire_lock(&self.conn);
        let mut stmt = conn
            .prepare(
                "SELECT atom_type, name, outgoing FROM atoms WHERE atom_type = ?1 ORDER BY handle",
            )
            .map_err(sql_error("atoms_of_type"))?;
        let rows = stmt
            .query_map(params![atom_type.as_str()], Self::read_row)
            .map_err(sql_error("atoms_of_type"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sql_error("atoms_of_type"))?;
        rows.into_iter().map(Self::row_to_atom).collect()
    }

    fn incoming(&self, handle: &Handle) -> Result<Vec<Atom>> {
        let conn = acquire_lock(&self.conn);
        let mut stmt = conn
            .prepare(
                "SELECT a.atom_type, a.name, a.outgoing FROM atoms a
                 WHERE a.handle IN (SELECT link FROM atom_outgoing WHERE target = ?1)
                 ORDER BY a.handle",
            )
            .map_err(sql_error("incoming"))?;
        let rows = stmt
            .query_map(params![handle.to_hex()], Self::read_row)
            .map_err(sql_error("incoming"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sql_error("incoming"))?;
        rows.into_iter().map(Self::row_to_atom).collect()
    }

    fn max_number(&self) -> Result<Option<u64>> {
        let conn = acquire_lock(&self.conn);
        let max: Option<i64> = conn
            .query_row(
                "SELECT MAX(CAST(name AS INTEGER)) FROM atoms WHERE atom_type = ?1",
                params![AtomType::NumberNode.as_str()],
                |row| row.get(0),
            )
            .map_err(sql_error("max_number"))?;
        Ok(max.filter(|n| *n >= 0).map(|n| n as u64))
    }

    fn stats(&self) -> Result<StoreStats> {
        let conn = acquire_lock(&self.conn);
        let mut stmt = conn
            .prepare("SELECT atom_type, COUNT(*) FROM atoms GROUP BY atom_type")
            .map_err(sql_error("stats"))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
            .map_err(sql_error("stats"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sql_error("stats"))?;

        let mut stats = StoreStats::default();
        for (type_name, count) in rows {
            let atom_type = AtomType::parse(&type_name).ok_or_else(|| {
                Error::operation("stats", format!("unknown atom type '{type_name}'"))
            })?;
            stats.record(atom_type, count as usize);
        }
        Ok(stats)
    }

    fn contains(&self, handle: &Handle) -> Result<bool> {
        let conn = acquire_lock(&self.conn);
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM atoms WHERE handle = ?1",
                params![handle.to_hex()],
                |row| row.get(0),
            )
            .optional()
            .map_err(sql_error("contains"))?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_insert_node_is_idempotent() {
        let store = SqliteAtomStore::in_memory().unwrap();
        let a = store.insert_node(AtomType::WordNode, "cat").unwrap();
        let b = store.insert_node(AtomType::WordNode, "cat").unwrap();

        assert_eq!(a, b);
        assert_eq!(store.stats().unwrap().node_count, 1);
        assert_eq!(
            store.get_atom(&a).unwrap(),
            Some(Atom::node(AtomType::WordNode, "cat"))
        );
    }

    #[test]
    fn test_insert_link_roundtrips_outgoing_order() {
        let store = SqliteAtomStore::in_memory().unwrap();
        let a = store.insert_node(AtomType::WordNode, "a").unwrap();
        let b = store.insert_node(AtomType::WordNode, "b").unwrap();

        let link = store.insert_link(AtomType::ListLink, &[b, a]).unwrap();
        let again = store.insert_link(AtomType::ListLink, &[b, a]).unwrap();

        assert_eq!(link, again);
        assert_eq!(
            store.get_atom(&link).unwrap(),
            Some(Atom::link(AtomType::ListLink, vec![b, a]))
        );
        assert_eq!(store.stats().unwrap().link_count, 1);
    }

    #[test]
    fn test_insert_link_rejects_dangling() {
        let store = SqliteAtomStore::in_memory().unwrap();
        let ghost = Handle::for_node(AtomType::WordNode, "ghost");

        let result = store.insert_link(AtomType::ReferenceLink, &[ghost]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(store.stats().unwrap().total(), 0);
    }

    #[test]
    fn test_outgoing_rows_require_known_atoms() {
        let store = SqliteAtomStore::in_memory().unwrap();
        let known = store.insert_node(AtomType::WordNode, "cat").unwrap().to_hex();
        let unknown = Handle::for_node(AtomType::WordNode, "dog").to_hex();
        let conn = acquire_lock(&store.conn);

        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);

        let unknown_link = conn.execute(
            "INSERT INTO atom_outgoing (link, position, target) VALUES (?1, 0, ?2)",
            params![unknown, known],
        );
        assert!(unknown_link.is_err());

        let unknown_target = conn.execute(
            "INSERT INTO atom_outgoing (link, position, target) VALUES (?1, 0, ?2)",
            params![known, unknown],
        );
        assert!(unknown_target.is_err());
    }

    #[test]
    fn test_incoming_and_type_queries() {
        let store = SqliteAtomStore::in_memory().unwrap();
        let a = store.insert_node(AtomType::WordNode, "a").unwrap();
        let b = store.insert_node(AtomType::WordNode, "b").unwrap();
        store.insert_link(AtomType::ListLink, &[a, b]).unwrap();
        store.insert_link(AtomType::ReferenceLink, &[a]).unwrap();

        assert_eq!(store.incoming(&a).unwrap().len(), 2);
        assert_eq!(store.incoming(&b).unwrap().len(), 1);
        assert_eq!(store.atoms_of_type(AtomType::WordNode).unwrap().len(), 2);
    }

    #[test]
    fn test_max_number() {
        let store = SqliteAtomStore::in_memory().unwrap();
        assert_eq!(store.max_number().unwrap(), None);

        store.insert_node(AtomType::NumberNode, "9").unwrap();
        store.insert_node(AtomType::NumberNode, "12").unwrap();
        assert_eq!(store.max_number().unwrap(), Some(12));
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("atoms.db");

        let handle = {
            let store = SqliteAtomStore::new(&path).unwrap();
            store.insert_node(AtomType::SentenceNode, "sentence@x").unwrap()
        };

        let reopened = SqliteAtomStore::new(&path).unwrap();
        assert!(reopened.contains(&handle).unwrap());
        assert_eq!(reopened.db_path(), Some(path.as_path()));
    }
}
