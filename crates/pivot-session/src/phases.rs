//! The phase lock state machine.
//!
//! A phase moves `unborn -> draft -> locked`; locked is terminal. Every
//! operation here is a read-modify-write of the freshly loaded state
//! document, so the locked check always runs against the latest stored
//! record immediately before the write.

use chrono::Utc;
use pivot_core::{
  Error, Result,
  keys::{DraftKind, StorageKey},
  phase::{Phase, ValidationOutcome},
  store::Repository,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{Session, state::StateDoc};

/// Create the phase at `index` inside `doc` if it does not exist yet.
/// Idempotent for existing indices. A new phase must be the next
/// contiguous index, and every earlier phase must already be locked.
pub(crate) fn ensure_in(
  doc: &mut StateDoc,
  vision_id: Uuid,
  index: u32,
) -> Result<&Phase> {
  if !doc.sequences.contains_key(&vision_id) {
    return Err(Error::UnknownVision(vision_id));
  }
  let phases = doc.phases.entry(vision_id).or_default();
  let next = phases.len() as u32;
  if index < next {
    return Ok(&phases[index as usize]);
  }
  if index > next {
    return Err(Error::NonContiguousRefinement { expected: next, got: index });
  }
  if phases.last().is_some_and(|prev| !prev.is_locked()) {
    return Err(Error::UnlockedAncestor { vision_id, index });
  }
  phases.push(Phase::new(vision_id, index));
  Ok(&phases[index as usize])
}

fn phase_mut<'a>(
  doc: &'a mut StateDoc,
  vision_id: Uuid,
  index: u32,
) -> Result<&'a mut Phase> {
  doc
    .phases
    .get_mut(&vision_id)
    .and_then(|phases| phases.get_mut(index as usize))
    .ok_or(Error::UnknownPhase { vision_id, index })
}

impl<R: Repository> Session<R> {
  /// `unborn -> draft` if the phase is absent; idempotent otherwise.
  pub fn ensure_phase(&self, vision_id: Uuid, index: u32) -> Result<Phase> {
    let mut doc = self.state();
    let phase = ensure_in(&mut doc, vision_id, index)?.clone();
    self.save_state(&doc);
    Ok(phase)
  }

  /// Replace the working draft of an unlocked phase.
  pub fn update_draft(
    &self,
    vision_id: Uuid,
    index: u32,
    content: serde_json::Value,
  ) -> Result<Phase> {
    let mut doc = self.state();
    let phase = phase_mut(&mut doc, vision_id, index)?;
    phase.set_draft(content)?;
    let updated = phase.clone();
    self.save_state(&doc);
    Ok(updated)
  }

  /// `draft -> locked`: freeze the draft into immutable content.
  ///
  /// Idempotent on an already-locked phase — the stored record is returned
  /// untouched and nothing is written.
  pub fn validate_phase(
    &self,
    vision_id: Uuid,
    index: u32,
    outcome: ValidationOutcome,
  ) -> Result<Phase> {
    let mut doc = self.state();
    let phase = phase_mut(&mut doc, vision_id, index)?;
    if phase.is_locked() {
      return Ok(phase.clone());
    }
    phase.lock(outcome, Utc::now())?;
    let locked = phase.clone();
    self.save_state(&doc);

    // Compat mirror for older readers; the document's lockedAt stays
    // authoritative.
    let flag = StorageKey::LockFlag { vision_id, refinement_index: index }.encode();
    if let Err(err) = self.repo.set(&flag, "true") {
      warn!(key = flag.as_str(), %err, "lock flag write dropped");
    }

    info!(%vision_id, index, "phase locked");
    Ok(locked)
  }

  // ── Per-vision worksheets ─────────────────────────────────────────────

  /// Store a free-text worksheet for `vision_id`. Best-effort.
  pub fn save_worksheet(&self, vision_id: Uuid, kind: DraftKind, text: &str) {
    let key = StorageKey::Draft { kind, vision_id }.encode();
    if let Err(err) = self.repo.set(&key, text) {
      warn!(key = key.as_str(), %err, "worksheet write dropped");
    }
  }

  /// Read a free-text worksheet back, or `None` on absence or failure.
  pub fn load_worksheet(&self, vision_id: Uuid, kind: DraftKind) -> Option<String> {
    let key = StorageKey::Draft { kind, vision_id }.encode();
    match self.repo.get(&key) {
      Ok(found) => found,
      Err(err) => {
        warn!(key = key.as_str(), %err, "worksheet read failed, treating as empty");
        None
      }
    }
  }
}
