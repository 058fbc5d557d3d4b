//! The versioned whole-hierarchy state document.
//!
//! The entire problem/vision/phase graph is stored as one JSON document
//! under a versioned key. Persisted documents call visions "sequences";
//! the serde names preserve the stored shape, camelCase fields included.

use std::collections::BTreeMap;

use pivot_core::{
  keys::{STATE_KEY, STATE_KEY_LEGACY},
  phase::Phase,
  problem::Problem,
  store::Repository,
  vision::Vision,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Session;

/// The whole stored graph. `Default` is the empty state a fresh (or
/// unreadable) repository falls back to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateDoc {
  pub problems:            BTreeMap<Uuid, Problem>,
  pub sequences:           BTreeMap<Uuid, Vision>,
  /// Phases per vision, ordered by index; indices are contiguous from 0.
  pub phases:              BTreeMap<Uuid, Vec<Phase>>,
  pub current_problem_id:  Option<Uuid>,
  pub current_sequence_id: Option<Uuid>,
}

impl<R: Repository> Session<R> {
  /// Load the current state document, falling back from the current key to
  /// the legacy key, and from any failure to the empty document.
  pub fn state(&self) -> StateDoc {
    for key in [STATE_KEY, STATE_KEY_LEGACY] {
      match self.repo.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
          Ok(doc) => return doc,
          Err(err) => warn!(key, %err, "state document unreadable, ignoring"),
        },
        Ok(None) => {}
        Err(err) => warn!(key, %err, "repository read failed, treating as empty"),
      }
    }
    StateDoc::default()
  }

  /// Persist the state document under the current version key.
  /// Best-effort: a failed write is logged and dropped.
  pub(crate) fn save_state(&self, doc: &StateDoc) {
    let raw = match serde_json::to_string(doc) {
      Ok(raw) => raw,
      Err(err) => {
        warn!(%err, "state document failed to serialize, write skipped");
        return;
      }
    };
    match self.repo.set(STATE_KEY, &raw) {
      Ok(()) => debug!(key = STATE_KEY, bytes = raw.len(), "state saved"),
      Err(err) => warn!(key = STATE_KEY, %err, "repository write failed, state dropped"),
    }
  }
}
