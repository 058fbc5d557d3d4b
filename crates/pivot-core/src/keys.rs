//! Storage-key layout for the repository.
//!
//! Every key the system reads or writes is produced by [`StorageKey::encode`]
//! so read and write sites can never drift apart. The concrete strings are
//! load-bearing: they must match documents written by earlier releases.

use uuid::Uuid;

/// Current whole-hierarchy document key.
pub const STATE_KEY: &str = "rps.v3";
/// Legacy minimal document key, read as a fallback and never written.
pub const STATE_KEY_LEGACY: &str = "rps.min.v1";

/// Which per-vision free-text draft a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftKind {
  /// Qualitative worksheet of the first refinement.
  Phase1Qualitative,
  /// Quantitative worksheet of the first refinement.
  Phase1Quantitative,
  /// Trial worksheet of the second refinement.
  Phase2Trial,
}

/// A structured address in the key-value repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
  /// The whole hierarchy graph as one JSON document.
  State,
  /// Frozen snapshot for one (vision, refinement) slot.
  Snapshot { vision_id: Uuid, refinement_index: u32 },
  /// Per-vision free-text worksheet.
  Draft { kind: DraftKind, vision_id: Uuid },
  /// Write-only compat mirror of a phase's locked state; the document's
  /// `lockedAt` stays authoritative.
  LockFlag { vision_id: Uuid, refinement_index: u32 },
}

impl StorageKey {
  pub fn encode(&self) -> String {
    match self {
      Self::State => STATE_KEY.to_owned(),
      Self::Snapshot { vision_id, refinement_index } => {
        format!("md_pivot_snapshot_{vision_id}_{refinement_index}")
      }
      Self::Draft { kind, vision_id } => match kind {
        DraftKind::Phase1Qualitative => format!("md_phase1_qual_{vision_id}"),
        DraftKind::Phase1Quantitative => format!("md_phase1_quant_{vision_id}"),
        DraftKind::Phase2Trial => format!("md_phase2_trial_{vision_id}"),
      },
      Self::LockFlag { vision_id, refinement_index } => {
        format!("md_refinement{refinement_index}_locked_{vision_id}")
      }
    }
  }
}
