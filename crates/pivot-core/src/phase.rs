//! Phase — the unit of progressive elaboration within a vision.
//!
//! Phases are numbered contiguously from 0 and transition exactly once from
//! a mutable draft to an immutable locked record. The absence of `locked_at`
//! means the phase is still a draft; once it is set, `draft` is cleared and
//! `content` becomes permanently read-only. There is no locked → draft
//! transition; reconsidering a refinement is modeled as creating a new
//! sibling vision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Lifecycle ───────────────────────────────────────────────────────────────

/// The lifecycle state of a phase. `Unborn` exists only as the absence of a
/// record; a stored phase is either a draft or locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseState {
  Draft,
  Locked,
}

/// The caller's self-report submitted alongside a validate call.
///
/// `tests_done == false` must be accompanied by a non-empty
/// `bypass_reason`: unverified work is admitted, but only explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
  pub tests_done:    bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bypass_reason: Option<String>,
}

// ─── Phase ───────────────────────────────────────────────────────────────────

/// One numbered refinement step. Mutable only while unlocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
  pub phase_id:      Uuid,
  pub vision_id:     Uuid,
  pub index:         u32,
  /// Working content; present only while the phase is unlocked.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub draft:         Option<serde_json::Value>,
  /// Frozen content; present only after locking.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content:       Option<serde_json::Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tests_done:    Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bypass_reason: Option<String>,
  /// Absence means the phase is still a draft.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub locked_at:     Option<DateTime<Utc>>,
}

impl Phase {
  /// Create an empty draft phase at `index` for `vision_id`.
  pub fn new(vision_id: Uuid, index: u32) -> Self {
    Self {
      phase_id: Uuid::new_v4(),
      vision_id,
      index,
      draft: None,
      content: None,
      tests_done: None,
      bypass_reason: None,
      locked_at: None,
    }
  }

  pub fn is_locked(&self) -> bool { self.locked_at.is_some() }

  pub fn state(&self) -> PhaseState {
    if self.is_locked() { PhaseState::Locked } else { PhaseState::Draft }
  }

  /// Replace the working draft. Errors with [`Error::PhaseLocked`] once the
  /// phase is locked.
  pub fn set_draft(&mut self, content: serde_json::Value) -> Result<()> {
    if self.is_locked() {
      return Err(Error::PhaseLocked { vision_id: self.vision_id, index: self.index });
    }
    self.draft = Some(content);
    Ok(())
  }

  /// Freeze the draft into immutable content and stamp `locked_at`.
  ///
  /// Idempotent on an already-locked phase: the record is left exactly as
  /// it was, including the original `locked_at`.
  pub fn lock(&mut self, outcome: ValidationOutcome, at: DateTime<Utc>) -> Result<()> {
    if self.is_locked() {
      return Ok(());
    }
    if !outcome.tests_done
      && outcome.bypass_reason.as_deref().is_none_or(|r| r.trim().is_empty())
    {
      return Err(Error::MissingBypassReason);
    }
    self.content = self.draft.take();
    self.tests_done = Some(outcome.tests_done);
    self.bypass_reason = outcome.bypass_reason;
    self.locked_at = Some(at);
    Ok(())
  }
}
