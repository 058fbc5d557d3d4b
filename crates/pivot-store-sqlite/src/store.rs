//! [`SqliteRepository`] — the SQLite implementation of
//! [`pivot_core::store::Repository`].

use std::{path::Path, sync::Mutex};

use pivot_core::store::Repository;
use rusqlite::{Connection, OptionalExtension as _};

use crate::{Error, Result, schema::SCHEMA};

/// A Pivot repository backed by a single SQLite file.
///
/// The connection sits behind a mutex: the core is single-threaded and
/// synchronous, so one connection serves the whole session.
pub struct SqliteRepository {
  conn: Mutex<Connection>,
}

impl SqliteRepository {
  /// Open (or create) a repository at `path` and run schema
  /// initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::from_connection(Connection::open(path)?)
  }

  /// Open an in-memory repository — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    Self::from_connection(Connection::open_in_memory()?)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn: Mutex::new(conn) })
  }

  fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
    let guard = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
    f(&guard)
  }
}

impl Repository for SqliteRepository {
  type Error = Error;

  fn get(&self, key: &str) -> Result<Option<String>> {
    self.with_conn(|conn| {
      let value = conn
        .query_row(
          "SELECT value FROM kv WHERE key = ?1",
          rusqlite::params![key],
          |row| row.get(0),
        )
        .optional()?;
      Ok(value)
    })
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self.with_conn(|conn| {
      conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        rusqlite::params![key, value],
      )?;
      Ok(())
    })
  }
}
