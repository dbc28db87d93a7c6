//! Error type for `cerimonial-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("email already registered: {0}")]
  DuplicateEmail(String),

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("core error: {0}")]
  Core(#[from] cerimonial_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The password hashing task panicked or was cancelled.
  #[error("background task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
