//! Error type for `persona-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] persona_core::Error),

  #[error("connection pool error: {0}")]
  Pool(#[from] r2d2::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("blocking task failed: {0}")]
  Task(#[from] tokio::task::JoinError),

  #[error("decode error: {0}")]
  Decode(String),

  /// The natural key is already taken; nothing was written.
  #[error("record already exists")]
  DuplicateRecord,

  #[error("record not found: {0}")]
  RecordNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for persona_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DuplicateRecord => Self::DuplicateRecord,
      Error::RecordNotFound(id) => Self::RecordNotFound(id),
      Error::Core(inner) => inner,
      other => Self::Persistence(Box::new(other)),
    }
  }
}
