//! Snapshot — the immutable, versioned record of a validated refinement.
//!
//! A snapshot aggregates the refinement's time frame, parameters, equation
//! descriptors, and criteria under metadata that links it to its parent
//! refinement. The builder only aggregates and timestamps; it performs no
//! numeric computation. Snapshots for the same (vision, refinement) slot
//! are singletons — writing one overwrites the prior record — but a locked
//! phase's content remains the durable source of truth; a snapshot is a
//! derived, re-buildable projection of it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  equation::{Criterion, EquationDescriptor, StockDescriptor},
  parameter::ParameterSet,
};

// ─── Components ──────────────────────────────────────────────────────────────

/// The projection window a refinement reasons over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeFrame {
  pub horizon:   u32,
  /// Free-text period label, e.g. "month".
  pub time_unit: String,
}

/// Linkage and provenance for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
  pub problem_id:              Uuid,
  pub vision_id:               Uuid,
  pub refinement_index:        u32,
  /// `None` only for the first refinement of a vision.
  pub parent_refinement_index: Option<u32>,
  /// Stamped at build time; never revised.
  pub validated_at:            DateTime<Utc>,
}

/// The caller-assembled ingredients of a snapshot, minus linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotParts {
  pub time:        TimeFrame,
  pub parameters:  ParameterSet,
  pub stocks:      BTreeMap<String, StockDescriptor>,
  pub flows:       BTreeMap<String, EquationDescriptor>,
  pub auxiliaries: BTreeMap<String, EquationDescriptor>,
  pub criteria:    Vec<Criterion>,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// The frozen record of one validated refinement. Structurally immutable:
/// building a successor copies, never mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  pub meta:        SnapshotMeta,
  pub time:        TimeFrame,
  pub parameters:  ParameterSet,
  pub stocks:      BTreeMap<String, StockDescriptor>,
  pub flows:       BTreeMap<String, EquationDescriptor>,
  pub auxiliaries: BTreeMap<String, EquationDescriptor>,
  pub criteria:    Vec<Criterion>,
}

impl Snapshot {
  /// Assemble a snapshot for `refinement_index`, linked to `parent`.
  ///
  /// With a parent, the index must be exactly `parent's index + 1`; with
  /// no parent it must be 0. Violations fail the whole build — no partial
  /// snapshot is ever returned. The parent is read, never mutated.
  pub fn build(
    parent: Option<&Snapshot>,
    problem_id: Uuid,
    vision_id: Uuid,
    refinement_index: u32,
    parts: SnapshotParts,
  ) -> Result<Self> {
    let parent_refinement_index = match parent {
      Some(p) => {
        let expected = p.meta.refinement_index + 1;
        if refinement_index != expected {
          return Err(Error::NonContiguousRefinement { expected, got: refinement_index });
        }
        Some(p.meta.refinement_index)
      }
      None => {
        if refinement_index != 0 {
          return Err(Error::NonContiguousRefinement { expected: 0, got: refinement_index });
        }
        None
      }
    };

    Ok(Self {
      meta: SnapshotMeta {
        problem_id,
        vision_id,
        refinement_index,
        parent_refinement_index,
        validated_at: Utc::now(),
      },
      time: parts.time,
      parameters: parts.parameters,
      stocks: parts.stocks,
      flows: parts.flows,
      auxiliaries: parts.auxiliaries,
      criteria: parts.criteria,
    })
  }

  /// Serialise to the persisted JSON shape.
  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  /// Parse a snapshot back from its persisted JSON shape.
  pub fn from_json(raw: &str) -> Result<Self> { Ok(serde_json::from_str(raw)?) }
}
