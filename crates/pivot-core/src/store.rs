//! The `Repository` trait and the in-memory test double.
//!
//! The trait is implemented by storage backends (e.g.
//! `pivot-store-sqlite`). Higher layers depend on this abstraction, not on
//! any concrete backend, and treat every repository failure as "no data":
//! reads degrade to empty, writes are dropped. The core never touches
//! ambient storage directly.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Mutex, MutexGuard},
};

/// Abstraction over the key-value persistence substrate.
///
/// Both operations are synchronous and fallible; callers in the session
/// layer catch errors locally rather than propagating them, so a missing
/// or broken backend degrades the system instead of crashing it.
pub trait Repository {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`, or `None` if absent.
  fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Store `value` under `key`, replacing any prior value.
  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

// ─── In-memory double ────────────────────────────────────────────────────────

/// A `HashMap`-backed repository for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryRepository {
  inner: Mutex<HashMap<String, String>>,
}

impl MemoryRepository {
  pub fn new() -> Self { Self::default() }

  /// Number of keys currently stored; test-support accessor.
  pub fn len(&self) -> usize { self.guard().len() }

  pub fn is_empty(&self) -> bool { self.guard().is_empty() }

  fn guard(&self) -> MutexGuard<'_, HashMap<String, String>> {
    // A poisoned lock only means a writer panicked mid-insert; the map
    // itself is still a valid map.
    match self.inner.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    }
  }
}

impl Repository for MemoryRepository {
  type Error = Infallible;

  fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(self.guard().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), Infallible> {
    self.guard().insert(key.to_owned(), value.to_owned());
    Ok(())
  }
}
