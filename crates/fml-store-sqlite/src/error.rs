//! Error type for `fml-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] fml_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted a write against a lead that was not found.
  #[error("lead not found: {0}")]
  LeadNotFound(uuid::Uuid),

  #[error("note content must not be empty")]
  EmptyNoteContent,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
