//! Equation descriptors for stocks, flows, and auxiliaries.
//!
//! Equations are opaque descriptive strings, not executable formulas. The
//! only executable rule in the system is the ledger engine's per-period
//! arithmetic; these descriptors document intent for the reader.

use serde::{Deserialize, Serialize};

/// Whether an equation is settled or still expected to change in a later
/// refinement.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EquationStatus {
  Fixed,
  Refinable,
  #[default]
  Unspecified,
}

/// A stock — the quantity tracked over time. Carries its initial value in
/// addition to the common descriptor fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDescriptor {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unit:            Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:     Option<String>,
  pub initial:         f64,
  pub equation:        String,
  #[serde(default)]
  pub equation_status: EquationStatus,
}

/// A flow or auxiliary quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquationDescriptor {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unit:            Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:     Option<String>,
  pub equation:        String,
  #[serde(default)]
  pub equation_status: EquationStatus,
}

/// A named boolean test a refinement is judged against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub equation:    String,
}
