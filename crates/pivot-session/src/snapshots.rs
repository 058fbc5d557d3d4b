//! Snapshot persistence under the compatibility key layout.
//!
//! One slot per (vision, refinement index); publishing to a slot replaces
//! whatever was there. The locked phase's content remains the durable
//! source of truth — a snapshot is a derived, re-buildable projection, so
//! a dropped write degrades the cache, not the record.

use pivot_core::{
  Error, Result,
  keys::StorageKey,
  phase::{Phase, ValidationOutcome},
  snapshot::{Snapshot, SnapshotParts},
  store::Repository,
};
use tracing::warn;
use uuid::Uuid;

use crate::Session;

impl<R: Repository> Session<R> {
  /// Build the snapshot for `refinement_index` and write it to its slot.
  ///
  /// For index *n* ≥ 1 the parent is read from slot *n − 1*; a missing or
  /// unreadable parent fails the build as non-contiguous. The write itself
  /// is best-effort.
  pub fn publish_snapshot(
    &self,
    vision_id: Uuid,
    refinement_index: u32,
    parts: SnapshotParts,
  ) -> Result<Snapshot> {
    let doc = self.state();
    let vision = doc
      .sequences
      .get(&vision_id)
      .ok_or(Error::UnknownVision(vision_id))?;

    let parent = match refinement_index {
      0 => None,
      n => Some(self.load_snapshot(vision_id, n - 1).ok_or(
        Error::NonContiguousRefinement { expected: 0, got: refinement_index },
      )?),
    };

    let snapshot = Snapshot::build(
      parent.as_ref(),
      vision.problem_id,
      vision_id,
      refinement_index,
      parts,
    )?;

    let key = StorageKey::Snapshot { vision_id, refinement_index }.encode();
    let raw = snapshot.to_json()?;
    if let Err(err) = self.repo.set(&key, &raw) {
      warn!(key = key.as_str(), %err, "snapshot write dropped");
    }
    Ok(snapshot)
  }

  /// Read the snapshot stored for a slot, or `None` on absence, read
  /// failure, or an unparseable record.
  pub fn load_snapshot(&self, vision_id: Uuid, refinement_index: u32) -> Option<Snapshot> {
    let key = StorageKey::Snapshot { vision_id, refinement_index }.encode();
    match self.repo.get(&key) {
      Ok(Some(raw)) => match Snapshot::from_json(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
          warn!(key = key.as_str(), %err, "stored snapshot unreadable");
          None
        }
      },
      Ok(None) => None,
      Err(err) => {
        warn!(key = key.as_str(), %err, "snapshot read failed, treating as absent");
        None
      }
    }
  }

  /// Freeze a refinement in one step: publish its snapshot, then lock the
  /// phase. The snapshot is published first so a non-contiguous build
  /// never locks anything; if validation is then rejected, the rewritten
  /// slot is overwritten again by the next successful attempt.
  pub fn validate_with_snapshot(
    &self,
    vision_id: Uuid,
    index: u32,
    outcome: ValidationOutcome,
    parts: SnapshotParts,
  ) -> Result<(Phase, Snapshot)> {
    let snapshot = self.publish_snapshot(vision_id, index, parts)?;
    let phase = self.validate_phase(vision_id, index, outcome)?;
    Ok((phase, snapshot))
  }
}
