//! Parameters — named numeric quantities, and the registry that owns them.
//!
//! Parameters are exclusively owned by the snapshot that declares them.
//! Later snapshots that reuse a parameter copy it (see
//! [`ParameterSet::inherit`]); they never alias the parent's record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Classification ──────────────────────────────────────────────────────────

/// How settled a parameter's value is.
///
/// The default is `Provisional`: a quantity is a working assumption until
/// the author explicitly promotes it. This default rule lives here and
/// nowhere else.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
  Fixed,
  Variable,
  #[default]
  Provisional,
}

/// The value-type discriminant stored in persisted documents. Only numbers
/// exist today; the tag keeps the stored shape open for other types.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
  #[default]
  Number,
}

// ─── Parameter ───────────────────────────────────────────────────────────────

/// A named numeric quantity used by a refinement.
///
/// `introduced_at_refinement` records where the name first appeared and is
/// never revised; `last_modified_at_refinement` tracks the most recent
/// value or kind change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
  #[serde(rename = "type", default)]
  pub value_type:                  ParameterType,
  pub value:                       f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unit:                        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:                 Option<String>,
  #[serde(default)]
  pub kind:                        ParameterKind,
  #[serde(default)]
  pub introduced_at_refinement:    u32,
  #[serde(default)]
  pub last_modified_at_refinement: u32,
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// The set of parameters declared by one snapshot, keyed by name.
///
/// A `BTreeMap` keeps iteration and serialization order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
  inner: BTreeMap<String, Parameter>,
}

impl ParameterSet {
  pub fn new() -> Self { Self::default() }

  /// Deep-copy a parent snapshot's parameters into a fresh mutable set.
  /// The copies are independent; revising one never touches the parent.
  pub fn inherit(parent: &ParameterSet) -> Self { parent.clone() }

  /// Declare a new parameter at `refinement_index`. `kind` defaults to
  /// [`ParameterKind::Provisional`] when omitted. Name collisions within
  /// one set are rejected.
  pub fn declare(
    &mut self,
    name: &str,
    value: f64,
    unit: Option<String>,
    description: Option<String>,
    kind: Option<ParameterKind>,
    refinement_index: u32,
  ) -> Result<&Parameter> {
    if self.inner.contains_key(name) {
      return Err(Error::DuplicateParameterName(name.to_owned()));
    }
    let parameter = Parameter {
      value_type: ParameterType::Number,
      value,
      unit,
      description,
      kind: kind.unwrap_or_default(),
      introduced_at_refinement: refinement_index,
      last_modified_at_refinement: refinement_index,
    };
    Ok(self.inner.entry(name.to_owned()).or_insert(parameter))
  }

  /// Change a parameter's kind. Updates `last_modified_at_refinement`;
  /// never touches `introduced_at_refinement`.
  pub fn reclassify(
    &mut self,
    name: &str,
    new_kind: ParameterKind,
    refinement_index: u32,
  ) -> Result<&Parameter> {
    let parameter = self
      .inner
      .get_mut(name)
      .ok_or_else(|| Error::UnknownParameter(name.to_owned()))?;
    parameter.kind = new_kind;
    parameter.last_modified_at_refinement = refinement_index;
    Ok(parameter)
  }

  /// Override a parameter's value in a later refinement. Updates
  /// `last_modified_at_refinement`; never touches
  /// `introduced_at_refinement`.
  pub fn revise(
    &mut self,
    name: &str,
    value: f64,
    refinement_index: u32,
  ) -> Result<&Parameter> {
    let parameter = self
      .inner
      .get_mut(name)
      .ok_or_else(|| Error::UnknownParameter(name.to_owned()))?;
    parameter.value = value;
    parameter.last_modified_at_refinement = refinement_index;
    Ok(parameter)
  }

  pub fn get(&self, name: &str) -> Option<&Parameter> { self.inner.get(name) }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &Parameter)> {
    self.inner.iter()
  }

  pub fn len(&self) -> usize { self.inner.len() }

  pub fn is_empty(&self) -> bool { self.inner.is_empty() }
}
