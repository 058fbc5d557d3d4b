//! Error types for `pivot-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("problem not found: {0}")]
  UnknownProblem(Uuid),

  #[error("vision not found: {0}")]
  UnknownVision(Uuid),

  #[error("phase {index} of vision {vision_id} not found")]
  UnknownPhase { vision_id: Uuid, index: u32 },

  #[error("parameter not found: {0:?}")]
  UnknownParameter(String),

  #[error("duplicate parameter name: {0:?}")]
  DuplicateParameterName(String),

  /// A refinement index skipped forward or regressed instead of directly
  /// following its parent.
  #[error("non-contiguous refinement index: expected {expected}, got {got}")]
  NonContiguousRefinement { expected: u32, got: u32 },

  #[error("phase {index} of vision {vision_id} is locked")]
  PhaseLocked { vision_id: Uuid, index: u32 },

  /// Validating with `tests_done == false` requires a justification.
  #[error("unverified validation requires a non-empty bypass reason")]
  MissingBypassReason,

  /// A phase may only be created once every earlier phase is locked.
  #[error("phase {index} of vision {vision_id} has an unlocked ancestor")]
  UnlockedAncestor { vision_id: Uuid, index: u32 },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
