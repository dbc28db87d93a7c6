//! Error types for `cerimonial-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error("invalid money amount: {0:?}")]
  InvalidMoney(String),

  #[error("legacy export error: {0}")]
  Legacy(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
