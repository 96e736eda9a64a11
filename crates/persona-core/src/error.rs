//! Error types for `persona-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// At least one prediction branch failed. Which one is only logged.
  #[error("external prediction service failed")]
  ExternalService,

  #[error("record already exists")]
  DuplicateRecord,

  #[error("record not found: {0}")]
  RecordNotFound(i64),

  #[error(
    "nationality sequences are misaligned: {countries} countries, \
     {probabilities} probabilities"
  )]
  MisalignedNationality {
    countries:     usize,
    probabilities: usize,
  },

  #[error("persistence failure: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
