//! Error type for `pivot-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  /// The connection mutex was poisoned by a panicking writer.
  #[error("connection lock poisoned")]
  LockPoisoned,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
