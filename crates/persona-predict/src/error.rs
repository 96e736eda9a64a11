//! Error type for `persona-predict`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{service} request failed: {source}")]
  Http {
    service: &'static str,
    #[source]
    source:  reqwest::Error,
  },

  #[error("{service} returned {status}: {body}")]
  Status {
    service: &'static str,
    status:  reqwest::StatusCode,
    body:    String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
