//! Error types for `comedor-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown meal category: {0:?}")]
  UnknownMealCategory(String),

  #[error("invalid meal quantity: {0} (guest check-ins serve 1 or 2 meals)")]
  InvalidQuantity(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
