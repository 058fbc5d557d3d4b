//! Error type for `pivot-engine`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A user-entered value failed to parse as a finite number. The caller's
  /// policy is to retain its last valid value; nothing non-finite ever
  /// reaches the projection itself.
  #[error("invalid numeric input: {0:?}")]
  InvalidNumericInput(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
