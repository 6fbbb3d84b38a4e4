//! Error type for `partner-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// `insert` was called for an ID that is already stored.
  #[error("partner already exists: {0}")]
  AlreadyExists(String),

  /// `update` was called for an ID that is not stored.
  #[error("partner not found: {0}")]
  NotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
