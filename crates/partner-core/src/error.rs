//! Error types for `partner-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field was missing or malformed. Never reaches storage.
  #[error("validation error: {0}")]
  Validation(String),

  /// The storage collaborator failed during lookup or write.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
