//! Problem — the top-level subject under analysis.
//!
//! A problem is immutable once created, mirroring the phase-locking
//! philosophy: reconsidering a problem means creating a new one, not
//! editing the old. Deletion cascades to its visions and is the only
//! irreversible write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A subject under analysis. Locked at creation time; no field is ever
/// updated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
  pub problem_id:  Uuid,
  pub title:       String,
  /// Short description shown in listings.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub summary:     Option<String>,
  /// Long-form description.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

impl Problem {
  /// Construct a new problem with a fresh id and a server-assigned
  /// creation timestamp.
  pub fn new(
    title: impl Into<String>,
    summary: Option<String>,
    description: Option<String>,
  ) -> Self {
    Self {
      problem_id: Uuid::new_v4(),
      title: title.into(),
      summary,
      description,
      created_at: Utc::now(),
    }
  }
}
