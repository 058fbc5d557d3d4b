//! The on-demand projection review.
//!
//! Never persisted: presentation code calls this whenever a refinement's
//! numbers change and renders the result. The actual arithmetic lives in
//! `pivot-engine`; this module only pairs the ledger with its verdict.

use pivot_engine::{Overlay, Projection, Verdict, evaluate, project};
use serde::Serialize;

/// The numeric inputs a refinement page hands to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewInputs {
  pub initial_stock: f64,
  pub horizon:       u32,
  pub base_inflow:   f64,
  pub base_outflow:  f64,
  pub overlay:       Option<Overlay>,
  pub target:        f64,
}

/// A projected ledger together with its goal verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReview {
  pub projection: Projection,
  pub verdict:    Verdict,
}

/// Run the ledger and judge the final stock against the target.
pub fn review(inputs: &ReviewInputs) -> ProjectionReview {
  let projection = project(
    inputs.initial_stock,
    inputs.horizon,
    inputs.base_inflow,
    inputs.base_outflow,
    inputs.overlay,
  );
  let verdict = evaluate(projection.final_stock, inputs.target);
  ProjectionReview { projection, verdict }
}
