//! Integration tests for the session workflow against the in-memory
//! repository.

use std::collections::BTreeMap;

use pivot_core::{
  Error,
  keys::{DraftKind, STATE_KEY, STATE_KEY_LEGACY},
  parameter::ParameterSet,
  phase::{PhaseState, ValidationOutcome},
  snapshot::{SnapshotParts, TimeFrame},
  store::{MemoryRepository, Repository},
};
use pivot_engine::Overlay;
use serde_json::json;
use uuid::Uuid;

use crate::{ReviewInputs, Session, review};

fn session() -> Session<MemoryRepository> { Session::new(MemoryRepository::new()) }

fn tested() -> ValidationOutcome {
  ValidationOutcome { tests_done: true, bypass_reason: None }
}

fn parts(horizon: u32) -> SnapshotParts {
  SnapshotParts {
    time:        TimeFrame { horizon, time_unit: "month".into() },
    parameters:  ParameterSet::new(),
    stocks:      BTreeMap::new(),
    flows:       BTreeMap::new(),
    auxiliaries: BTreeMap::new(),
    criteria:    Vec::new(),
  }
}

// ─── Hierarchy ───────────────────────────────────────────────────────────────

#[test]
fn create_problem_selects_it() {
  let s = session();
  let problem = s.create_problem("Savings shortfall", Some("short".into()), None);

  assert_eq!(s.problems().len(), 1);
  let current = s.current_problem().unwrap();
  assert_eq!(current.problem_id, problem.problem_id);
  assert_eq!(current.title, "Savings shortfall");
}

#[test]
fn create_vision_seeds_phase_zero() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "baseline", None).unwrap();

  let phases = s.phases(vision.vision_id);
  assert_eq!(phases.len(), 1);
  assert_eq!(phases[0].index, 0);
  assert_eq!(phases[0].state(), PhaseState::Draft);
  assert_eq!(s.current_vision().unwrap().vision_id, vision.vision_id);
}

#[test]
fn create_vision_requires_existing_problem() {
  let s = session();
  let err = s.create_vision(Uuid::new_v4(), "orphan", None).unwrap_err();
  assert!(matches!(err, Error::UnknownProblem(_)));
}

#[test]
fn delete_problem_cascades_to_visions_and_phases() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  s.delete_problem(problem.problem_id).unwrap();

  assert!(s.problems().is_empty());
  assert!(s.visions(problem.problem_id).is_empty());
  assert!(s.phases(vision.vision_id).is_empty());
  assert_eq!(s.current_problem(), None);
  assert_eq!(s.current_vision(), None);
}

#[test]
fn delete_vision_keeps_siblings() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let keep = s.create_vision(problem.problem_id, "keep", None).unwrap();
  let spare = s.create_vision(problem.problem_id, "spare", None).unwrap();

  s.delete_vision(spare.vision_id).unwrap();

  let remaining = s.visions(problem.problem_id);
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].vision_id, keep.vision_id);
  // The deleted vision was current; the selection must not dangle.
  assert_eq!(s.current_vision(), None);
}

#[test]
fn selecting_a_problem_clears_foreign_vision_selection() {
  let s = session();
  let first = s.create_problem("first", None, None);
  let vision = s.create_vision(first.problem_id, "v", None).unwrap();
  let second = s.create_problem("second", None, None);

  s.select_problem(second.problem_id).unwrap();
  assert_eq!(s.current_vision(), None);

  s.select_vision(vision.vision_id).unwrap();
  assert_eq!(s.current_problem().unwrap().problem_id, first.problem_id);
  assert_eq!(s.current_vision().unwrap().vision_id, vision.vision_id);
}

// ─── Phase lock state machine ────────────────────────────────────────────────

#[test]
fn ensure_is_idempotent() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  let first = s.ensure_phase(vision.vision_id, 0).unwrap();
  let again = s.ensure_phase(vision.vision_id, 0).unwrap();
  assert_eq!(first.phase_id, again.phase_id);
  assert_eq!(s.phases(vision.vision_id).len(), 1);
}

#[test]
fn ensure_rejects_gap_indices() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  let err = s.ensure_phase(vision.vision_id, 2).unwrap_err();
  assert!(matches!(
    err,
    Error::NonContiguousRefinement { expected: 1, got: 2 }
  ));
}

#[test]
fn ensure_rejects_unlocked_ancestors() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  // Phase 0 is still a draft, so phase 1 may not be created yet.
  let err = s.ensure_phase(vision.vision_id, 1).unwrap_err();
  assert!(matches!(err, Error::UnlockedAncestor { index: 1, .. }));

  s.validate_phase(vision.vision_id, 0, tested()).unwrap();
  let phase = s.ensure_phase(vision.vision_id, 1).unwrap();
  assert_eq!(phase.index, 1);
}

#[test]
fn validate_freezes_draft_into_content() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  s.update_draft(vision.vision_id, 0, json!({ "stock": "savings" })).unwrap();
  let locked = s.validate_phase(vision.vision_id, 0, tested()).unwrap();

  assert!(locked.is_locked());
  assert_eq!(locked.content, Some(json!({ "stock": "savings" })));
  assert!(locked.draft.is_none());
  assert_eq!(locked.tests_done, Some(true));
}

#[test]
fn update_draft_after_lock_is_rejected_and_ineffective() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  s.update_draft(vision.vision_id, 0, json!("before")).unwrap();
  s.validate_phase(vision.vision_id, 0, tested()).unwrap();

  let err = s.update_draft(vision.vision_id, 0, json!("after")).unwrap_err();
  assert!(matches!(err, Error::PhaseLocked { index: 0, .. }));

  let stored = &s.phases(vision.vision_id)[0];
  assert_eq!(stored.content, Some(json!("before")));
  assert!(stored.draft.is_none());
}

#[test]
fn second_validate_is_a_pure_no_op() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  let first = s.validate_phase(vision.vision_id, 0, tested()).unwrap();
  // Even a would-be-invalid outcome does not disturb a locked phase.
  let second = s
    .validate_phase(
      vision.vision_id,
      0,
      ValidationOutcome { tests_done: false, bypass_reason: None },
    )
    .unwrap();

  assert_eq!(second.locked_at, first.locked_at);
  assert_eq!(second.tests_done, Some(true));
}

#[test]
fn unverified_validate_requires_bypass_reason() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  let err = s
    .validate_phase(
      vision.vision_id,
      0,
      ValidationOutcome { tests_done: false, bypass_reason: None },
    )
    .unwrap_err();
  assert!(matches!(err, Error::MissingBypassReason));
  assert!(!s.phases(vision.vision_id)[0].is_locked());

  let locked = s
    .validate_phase(
      vision.vision_id,
      0,
      ValidationOutcome {
        tests_done:    false,
        bypass_reason: Some("figures cross-checked against the worksheet".into()),
      },
    )
    .unwrap();
  assert!(locked.is_locked());
}

#[test]
fn validate_writes_the_lock_flag_mirror() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  s.validate_phase(vision.vision_id, 0, tested()).unwrap();

  let flag = format!("md_refinement0_locked_{}", vision.vision_id);
  assert_eq!(s.repository().get(&flag).unwrap().as_deref(), Some("true"));
}

#[test]
fn update_draft_on_unborn_phase_errors() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();

  let err = s.update_draft(vision.vision_id, 5, json!("x")).unwrap_err();
  assert!(matches!(err, Error::UnknownPhase { index: 5, .. }));
}

// ─── State document persistence ──────────────────────────────────────────────

#[test]
fn state_round_trips_through_the_repository() {
  let s = session();
  let problem = s.create_problem("durable", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();
  s.validate_phase(vision.vision_id, 0, tested()).unwrap();

  // A session over a copy of the stored document sees the same graph.
  let raw = s.repository().get(STATE_KEY).unwrap().unwrap();
  let reloaded = session();
  reloaded.repository().set(STATE_KEY, &raw).unwrap();

  assert_eq!(reloaded.problems()[0].problem_id, problem.problem_id);
  assert!(reloaded.phases(vision.vision_id)[0].is_locked());
  assert_eq!(
    reloaded.current_vision().unwrap().vision_id,
    vision.vision_id,
  );
}

#[test]
fn legacy_state_key_is_read_as_fallback() {
  let s = session();
  let problem = s.create_problem("old", None, None);
  let raw = s.repository().get(STATE_KEY).unwrap().unwrap();

  // A repository that only ever saw the legacy writer.
  let legacy = Session::new(MemoryRepository::new());
  legacy.repository().set(STATE_KEY_LEGACY, &raw).unwrap();

  assert_eq!(legacy.problems()[0].problem_id, problem.problem_id);

  // The next write migrates to the current key.
  legacy.create_problem("new", None, None);
  assert!(legacy.repository().get(STATE_KEY).unwrap().is_some());
  assert_eq!(legacy.problems().len(), 2);
}

#[test]
fn documents_with_unknown_fields_still_load() {
  let s = session();
  s.create_problem("p", None, None);
  let raw = s.repository().get(STATE_KEY).unwrap().unwrap();

  let mut doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
  doc["futureField"] = json!({ "ignored": true });
  let other = session();
  other.repository().set(STATE_KEY, &doc.to_string()).unwrap();

  assert_eq!(other.problems().len(), 1);
}

// ─── Degraded repository ─────────────────────────────────────────────────────

struct OfflineRepository;

#[derive(Debug, thiserror::Error)]
#[error("backend offline")]
struct Offline;

impl Repository for OfflineRepository {
  type Error = Offline;

  fn get(&self, _key: &str) -> Result<Option<String>, Offline> { Err(Offline) }

  fn set(&self, _key: &str, _value: &str) -> Result<(), Offline> { Err(Offline) }
}

#[test]
fn offline_repository_degrades_to_empty_state() {
  let s = Session::new(OfflineRepository);

  assert!(s.problems().is_empty());
  assert_eq!(s.current_problem(), None);

  // Creation still hands back a value; the write is dropped, not fatal.
  let problem = s.create_problem("ephemeral", None, None);
  assert_eq!(problem.title, "ephemeral");
  assert!(s.problems().is_empty());

  // Structural errors still surface through the empty state.
  let err = s.create_vision(problem.problem_id, "v", None).unwrap_err();
  assert!(matches!(err, Error::UnknownProblem(_)));

  assert_eq!(s.load_worksheet(Uuid::new_v4(), DraftKind::Phase2Trial), None);
  assert_eq!(s.load_snapshot(Uuid::new_v4(), 0), None);
}

// ─── Worksheets ──────────────────────────────────────────────────────────────

#[test]
fn worksheets_round_trip_under_compat_keys() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();
  let id = vision.vision_id;

  s.save_worksheet(id, DraftKind::Phase1Qualitative, "causes and effects");
  s.save_worksheet(id, DraftKind::Phase1Quantitative, "first numbers");
  s.save_worksheet(id, DraftKind::Phase2Trial, "trial run notes");

  assert_eq!(
    s.load_worksheet(id, DraftKind::Phase1Qualitative).as_deref(),
    Some("causes and effects"),
  );
  assert_eq!(
    s.repository().get(&format!("md_phase1_qual_{id}")).unwrap().as_deref(),
    Some("causes and effects"),
  );
  assert_eq!(
    s.repository().get(&format!("md_phase1_quant_{id}")).unwrap().as_deref(),
    Some("first numbers"),
  );
  assert_eq!(
    s.repository().get(&format!("md_phase2_trial_{id}")).unwrap().as_deref(),
    Some("trial run notes"),
  );
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

#[test]
fn snapshots_chain_through_their_slots() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();
  let id = vision.vision_id;

  let root = s.publish_snapshot(id, 0, parts(12)).unwrap();
  assert_eq!(root.meta.parent_refinement_index, None);
  assert_eq!(root.meta.problem_id, problem.problem_id);

  let child = s.publish_snapshot(id, 1, parts(12)).unwrap();
  assert_eq!(child.meta.parent_refinement_index, Some(0));

  let key = format!("md_pivot_snapshot_{id}_1");
  assert!(s.repository().get(&key).unwrap().is_some());
  assert_eq!(s.load_snapshot(id, 1).unwrap(), child);
}

#[test]
fn publishing_a_gap_index_fails_without_partial_state() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();
  let id = vision.vision_id;

  s.publish_snapshot(id, 0, parts(12)).unwrap();
  let err = s.publish_snapshot(id, 3, parts(12)).unwrap_err();
  assert!(matches!(err, Error::NonContiguousRefinement { got: 3, .. }));
  assert_eq!(s.load_snapshot(id, 3), None);
}

#[test]
fn republishing_a_slot_overwrites_it() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();
  let id = vision.vision_id;

  s.publish_snapshot(id, 0, parts(12)).unwrap();
  let replacement = s.publish_snapshot(id, 0, parts(24)).unwrap();
  assert_eq!(s.load_snapshot(id, 0).unwrap().time.horizon, 24);
  assert_eq!(s.load_snapshot(id, 0).unwrap(), replacement);
}

#[test]
fn validate_with_snapshot_locks_and_publishes() {
  let s = session();
  let problem = s.create_problem("p", None, None);
  let vision = s.create_vision(problem.problem_id, "v", None).unwrap();
  let id = vision.vision_id;

  s.update_draft(id, 0, json!({ "horizon": 12 })).unwrap();
  let (phase, snapshot) =
    s.validate_with_snapshot(id, 0, tested(), parts(12)).unwrap();

  assert!(phase.is_locked());
  assert_eq!(snapshot.meta.refinement_index, 0);
  assert_eq!(s.load_snapshot(id, 0).unwrap(), snapshot);
}

#[test]
fn publish_for_unknown_vision_errors() {
  let s = session();
  let err = s.publish_snapshot(Uuid::new_v4(), 0, parts(12)).unwrap_err();
  assert!(matches!(err, Error::UnknownVision(_)));
}

// ─── Projection review ───────────────────────────────────────────────────────

#[test]
fn review_pairs_ledger_with_verdict() {
  let baseline = review(&ReviewInputs {
    initial_stock: 3000.0,
    horizon:       12,
    base_inflow:   3000.0,
    base_outflow:  2500.0,
    overlay:       None,
    target:        10_000.0,
  });
  assert_eq!(baseline.projection.rows.len(), 12);
  assert_eq!(baseline.projection.final_stock, 9000.0);
  assert_eq!(baseline.verdict.gap, -1000.0);
  assert!(!baseline.verdict.attained);

  let improved = review(&ReviewInputs {
    initial_stock: 3000.0,
    horizon:       12,
    base_inflow:   3000.0,
    base_outflow:  2500.0,
    overlay:       Some(Overlay {
      from_period: 1,
      add_inflow:  1000.0,
      add_outflow: 500.0,
    }),
    target:        10_000.0,
  });
  assert_eq!(improved.projection.final_stock, 15_000.0);
  assert!(improved.verdict.attained);
}

#[test]
fn review_is_recomputed_fresh_each_call() {
  let inputs = ReviewInputs {
    initial_stock: 3000.0,
    horizon:       12,
    base_inflow:   4000.0,
    base_outflow:  3000.0,
    overlay:       Some(Overlay {
      from_period: 7,
      add_inflow:  1000.0,
      add_outflow: 500.0,
    }),
    target:        18_000.0,
  };
  let a = review(&inputs);
  let b = review(&inputs);
  assert_eq!(a, b);
  assert_eq!(a.projection.final_stock, 18_000.0);
  // The boundary case: hitting the target exactly counts as attained.
  assert!(a.verdict.attained);
  assert_eq!(a.verdict.gap, 0.0);
}
