//! Error types and the fixed status/text mapping of each request outcome.

use axum::http::StatusCode;
use thiserror::Error;

/// Value of the `error` field on success.
pub const NO_ERROR: &str = "null";

/// Every way a request can end short of success.
///
/// `Display` is the text sent to the client in the `error` field; causes are
/// kept as `#[source]` for logs only.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("action limited")]
  RateLimited,

  #[error("body length is too big")]
  /// `length` is `None` when the body carried no Content-Length and ran
  /// past `max` while streaming.
  BodyTooLarge { length: Option<u64>, max: usize },

  #[error("body reading failed")]
  BodyRead(#[source] axum::Error),

  #[error("input json is incorrect")]
  MalformedInput(#[source] serde_json::Error),

  #[error("error with external api")]
  ExternalService,

  #[error("data already in db")]
  DuplicateRecord,

  #[error("data not in db")]
  RecordNotFound(i64),

  #[error("error with db")]
  Persistence(#[source] persona_core::Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
      ApiError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::BodyRead(_) => StatusCode::INSUFFICIENT_STORAGE,
      ApiError::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::ExternalService
      | ApiError::DuplicateRecord
      | ApiError::RecordNotFound(_)
      | ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<persona_core::Error> for ApiError {
  fn from(e: persona_core::Error) -> Self {
    match e {
      persona_core::Error::ExternalService => ApiError::ExternalService,
      persona_core::Error::DuplicateRecord => ApiError::DuplicateRecord,
      persona_core::Error::RecordNotFound(id) => ApiError::RecordNotFound(id),
      other => ApiError::Persistence(other),
    }
  }
}

/// Failure to bring up the process-wide collaborators.
#[derive(Debug, Error)]
pub enum StartError {
  #[error("store error: {0}")]
  Store(#[from] persona_store_sqlite::Error),

  #[error("prediction client error: {0}")]
  Client(#[from] persona_predict::Error),
}
