//! The ledger projection — the one executable rule in the system.
//!
//! Given a starting stock, constant per-period rates, and an optional
//! overlay active from a given period onward, produce the period-by-period
//! ledger. Rows are derived values: produced fresh on every request, never
//! persisted. No rounding is applied here; rounding is a presentation
//! concern of the caller.

use serde::Serialize;

/// Inclusive ceiling applied to the horizon before iteration.
pub const MAX_HORIZON: u32 = 100_000;

/// An added activity: an extra inflow/outflow pair that becomes effective
/// from `from_period` onward (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
  pub from_period: u32,
  pub add_inflow:  f64,
  pub add_outflow: f64,
}

impl Overlay {
  fn active_in(&self, period: u32) -> bool { period >= self.from_period }
}

/// One period of the projected ledger. `stock_start` is the stock at the
/// start of the period; `stock_end` at its end. The convention is applied
/// uniformly across every consumer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
  /// Period index, numbered from 1.
  pub period:      u32,
  pub stock_start: f64,
  pub inflow:      f64,
  pub outflow:     f64,
  pub stock_end:   f64,
}

/// The full projected ledger plus its final stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
  pub rows:        Vec<LedgerRow>,
  pub final_stock: f64,
}

/// Project `initial_stock` over `horizon` periods at constant rates.
///
/// The horizon is clamped to `[1, MAX_HORIZON]` before iteration. For
/// period `t`, the overlay contributes iff it is present and
/// `t >= from_period`. Pure and total for all finite inputs; rejecting
/// non-finite input is the caller's job (see [`crate::parse_amount`]).
pub fn project(
  initial_stock: f64,
  horizon: u32,
  base_inflow: f64,
  base_outflow: f64,
  overlay: Option<Overlay>,
) -> Projection {
  let horizon = horizon.clamp(1, MAX_HORIZON);

  let mut rows = Vec::with_capacity(horizon as usize);
  let mut stock = initial_stock;
  for period in 1..=horizon {
    let (add_inflow, add_outflow) = match overlay {
      Some(o) if o.active_in(period) => (o.add_inflow, o.add_outflow),
      _ => (0.0, 0.0),
    };
    let inflow = base_inflow + add_inflow;
    let outflow = base_outflow + add_outflow;
    let stock_end = stock + inflow - outflow;
    rows.push(LedgerRow { period, stock_start: stock, inflow, outflow, stock_end });
    stock = stock_end;
  }

  let final_stock = rows.last().map_or(initial_stock, |row| row.stock_end);
  Projection { rows, final_stock }
}
