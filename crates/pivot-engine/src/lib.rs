//! Deterministic stock-and-flow projection engine.
//!
//! Pure synchronous; no storage or I/O dependencies. Everything here is
//! safe to call on every keystroke of a surrounding form: projections are
//! recomputed from scratch, never cached or persisted.
//!
//! # Quick start
//!
//! ```
//! use pivot_engine::{evaluate, project};
//!
//! let projection = project(3000.0, 12, 3000.0, 2500.0, None);
//! assert_eq!(projection.final_stock, 9000.0);
//!
//! let verdict = evaluate(projection.final_stock, 10_000.0);
//! assert!(!verdict.attained);
//! ```

pub mod error;
mod goal;
mod input;
mod ledger;

pub use error::{Error, Result};
pub use goal::{Verdict, evaluate};
pub use input::{parse_amount, parse_horizon};
pub use ledger::{LedgerRow, MAX_HORIZON, Overlay, Projection, project};
