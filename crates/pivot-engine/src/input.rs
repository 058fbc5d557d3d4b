//! The numeric input boundary.
//!
//! Form input is parsed here, before it can reach the projection. The
//! projection itself is total over finite numbers and never errors; these
//! helpers make sure it only ever sees finite numbers.

use crate::{Error, Result};

/// Parse a user-entered amount as a finite `f64`.
///
/// NaN and infinities are rejected along with unparseable text; the
/// caller's policy on error is to retain its last valid value.
pub fn parse_amount(raw: &str) -> Result<f64> {
  let value: f64 = raw
    .trim()
    .parse()
    .map_err(|_| Error::InvalidNumericInput(raw.to_owned()))?;
  if !value.is_finite() {
    return Err(Error::InvalidNumericInput(raw.to_owned()));
  }
  Ok(value)
}

/// Parse a user-entered horizon as a whole number of periods.
pub fn parse_horizon(raw: &str) -> Result<u32> {
  raw
    .trim()
    .parse()
    .map_err(|_| Error::InvalidNumericInput(raw.to_owned()))
}
