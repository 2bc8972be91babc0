//! Error types for `fml-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("lead not found: {0}")]
  LeadNotFound(Uuid),

  #[error("note content must not be empty")]
  EmptyNoteContent,

  #[error("unknown lead status: {0:?}")]
  UnknownStatus(String),

  #[error("estimated value must be non-negative, got {0}")]
  NegativeValue(f64),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
