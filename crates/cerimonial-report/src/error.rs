//! Error types for the report renderer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to write report: {0}")]
  Format(#[from] std::fmt::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
