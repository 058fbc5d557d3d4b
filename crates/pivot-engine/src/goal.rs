//! Goal evaluation over a projected final stock.

use serde::Serialize;

/// The signed distance to the target and whether it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
  /// `final_stock - target`; negative means the goal was missed.
  pub gap:      f64,
  pub attained: bool,
}

/// Compare a final stock against a target. Equality counts as attained —
/// the tie-break is the non-strict inequality.
pub fn evaluate(final_stock: f64, target: f64) -> Verdict {
  let gap = final_stock - target;
  Verdict { gap, attained: gap >= 0.0 }
}
