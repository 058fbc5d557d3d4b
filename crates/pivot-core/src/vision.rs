//! Vision — one way of framing a problem.
//!
//! A vision owns an ordered sequence of phases (stored separately, keyed by
//! the vision id) and is immutable once created. Persisted documents call
//! visions "sequences"; the serde names below preserve that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One complete framing of a problem. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vision {
  pub vision_id:  Uuid,
  pub problem_id: Uuid,
  pub title:      String,
  /// Short tag shown next to the title in listings.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tag:        Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Vision {
  /// Construct a new vision with a fresh id and a server-assigned
  /// creation timestamp.
  pub fn new(problem_id: Uuid, title: impl Into<String>, tag: Option<String>) -> Self {
    Self {
      vision_id: Uuid::new_v4(),
      problem_id,
      title: title.into(),
      tag,
      created_at: Utc::now(),
    }
  }
}
