//! Session orchestration for the Pivot decision-analysis core.
//!
//! A [`Session`] wraps any [`pivot_core::store::Repository`] and exposes
//! the progressive-refinement workflow on top of it: the problem/vision
//! hierarchy, the phase lock state machine, snapshot persistence under the
//! compatibility key layout, and the on-demand projection review.
//!
//! Every operation is a synchronous read-modify-write of the whole state
//! document. Repository failures never escape: reads degrade to an empty
//! document and writes are dropped, each with a logged warning, so a
//! missing backend leaves the session usable (if forgetful) rather than
//! broken.

mod hierarchy;
mod phases;
mod review;
mod snapshots;
mod state;

pub use pivot_core::{Error, Result};
pub use review::{ProjectionReview, ReviewInputs, review};
pub use state::StateDoc;

use pivot_core::store::Repository;

/// A single-user working session over one stored document graph.
pub struct Session<R> {
  pub(crate) repo: R,
}

impl<R: Repository> Session<R> {
  pub fn new(repo: R) -> Self { Self { repo } }

  /// The underlying repository, e.g. for inspection in tests.
  pub fn repository(&self) -> &R { &self.repo }
}

#[cfg(test)]
mod tests;
