//! The problem/vision hierarchy: creation, selection, and cascade
//! deletion.
//!
//! Problems and visions are immutable once created; deletion is the only
//! irreversible write and removes the entity with all of its children.
//! Identifiers and timestamps are assigned here, never by the caller.

use pivot_core::{
  Error, Result, phase::Phase, problem::Problem, store::Repository,
  vision::Vision,
};
use tracing::info;
use uuid::Uuid;

use crate::{Session, phases};

impl<R: Repository> Session<R> {
  // ── Creation ──────────────────────────────────────────────────────────

  /// Create a problem and select it. The record is locked at creation:
  /// there is no update operation.
  pub fn create_problem(
    &self,
    title: impl Into<String>,
    summary: Option<String>,
    description: Option<String>,
  ) -> Problem {
    let mut doc = self.state();
    let problem = Problem::new(title, summary, description);
    doc.problems.insert(problem.problem_id, problem.clone());
    doc.current_problem_id = Some(problem.problem_id);
    doc.current_sequence_id = None;
    self.save_state(&doc);
    info!(problem_id = %problem.problem_id, "problem created");
    problem
  }

  /// Create a vision under `problem_id`, seed its phase 0, and select it.
  pub fn create_vision(
    &self,
    problem_id: Uuid,
    title: impl Into<String>,
    tag: Option<String>,
  ) -> Result<Vision> {
    let mut doc = self.state();
    if !doc.problems.contains_key(&problem_id) {
      return Err(Error::UnknownProblem(problem_id));
    }
    let vision = Vision::new(problem_id, title, tag);
    doc.sequences.insert(vision.vision_id, vision.clone());
    phases::ensure_in(&mut doc, vision.vision_id, 0)?;
    doc.current_problem_id = Some(problem_id);
    doc.current_sequence_id = Some(vision.vision_id);
    self.save_state(&doc);
    info!(vision_id = %vision.vision_id, %problem_id, "vision created");
    Ok(vision)
  }

  // ── Deletion ──────────────────────────────────────────────────────────

  /// Delete a problem and every vision and phase under it.
  pub fn delete_problem(&self, problem_id: Uuid) -> Result<()> {
    let mut doc = self.state();
    if doc.problems.remove(&problem_id).is_none() {
      return Err(Error::UnknownProblem(problem_id));
    }
    let owned: Vec<Uuid> = doc
      .sequences
      .values()
      .filter(|v| v.problem_id == problem_id)
      .map(|v| v.vision_id)
      .collect();
    for vision_id in owned {
      doc.sequences.remove(&vision_id);
      doc.phases.remove(&vision_id);
      if doc.current_sequence_id == Some(vision_id) {
        doc.current_sequence_id = None;
      }
    }
    if doc.current_problem_id == Some(problem_id) {
      doc.current_problem_id = None;
    }
    self.save_state(&doc);
    info!(%problem_id, "problem deleted");
    Ok(())
  }

  /// Delete a vision and its phases. Phases are never deleted
  /// individually; this is the only path that removes them.
  pub fn delete_vision(&self, vision_id: Uuid) -> Result<()> {
    let mut doc = self.state();
    if doc.sequences.remove(&vision_id).is_none() {
      return Err(Error::UnknownVision(vision_id));
    }
    doc.phases.remove(&vision_id);
    if doc.current_sequence_id == Some(vision_id) {
      doc.current_sequence_id = None;
    }
    self.save_state(&doc);
    info!(%vision_id, "vision deleted");
    Ok(())
  }

  // ── Selection ─────────────────────────────────────────────────────────

  /// Make `problem_id` current. Clears the vision selection if it belongs
  /// to a different problem.
  pub fn select_problem(&self, problem_id: Uuid) -> Result<()> {
    let mut doc = self.state();
    if !doc.problems.contains_key(&problem_id) {
      return Err(Error::UnknownProblem(problem_id));
    }
    doc.current_problem_id = Some(problem_id);
    let stale = doc
      .current_sequence_id
      .and_then(|id| doc.sequences.get(&id))
      .is_none_or(|v| v.problem_id != problem_id);
    if stale {
      doc.current_sequence_id = None;
    }
    self.save_state(&doc);
    Ok(())
  }

  /// Make `vision_id` current, along with its owning problem.
  pub fn select_vision(&self, vision_id: Uuid) -> Result<()> {
    let mut doc = self.state();
    let Some(vision) = doc.sequences.get(&vision_id) else {
      return Err(Error::UnknownVision(vision_id));
    };
    doc.current_problem_id = Some(vision.problem_id);
    doc.current_sequence_id = Some(vision_id);
    self.save_state(&doc);
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub fn current_problem(&self) -> Option<Problem> {
    let doc = self.state();
    doc.current_problem_id.and_then(|id| doc.problems.get(&id).cloned())
  }

  pub fn current_vision(&self) -> Option<Vision> {
    let doc = self.state();
    doc.current_sequence_id.and_then(|id| doc.sequences.get(&id).cloned())
  }

  pub fn problems(&self) -> Vec<Problem> {
    self.state().problems.into_values().collect()
  }

  pub fn visions(&self, problem_id: Uuid) -> Vec<Vision> {
    let mut owned: Vec<Vision> = self
      .state()
      .sequences
      .into_values()
      .filter(|v| v.problem_id == problem_id)
      .collect();
    owned.sort_by_key(|v| v.created_at);
    owned
  }

  pub fn phases(&self, vision_id: Uuid) -> Vec<Phase> {
    self.state().phases.remove(&vision_id).unwrap_or_default()
  }
}
