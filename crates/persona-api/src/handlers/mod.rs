//! Endpoint orchestrators and the steps they share.
//!
//! Both endpoints run the same front half: rate check, body read, JSON parse.
//! Each step either passes its output on or ends the request with one
//! [`ApiError`].

pub mod del;
pub mod put;

use std::{error::Error as _, net::SocketAddr};

use axum::{
  extract::Request,
  http::header,
};
use bytes::Bytes;
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;

use crate::{error::ApiError, limiter::RateLimiter};

/// Ask the endpoint's limiter whether the client's address (port stripped)
/// is within quota.
pub(crate) fn check_rate(limiter: &RateLimiter, client: SocketAddr) -> Result<(), ApiError> {
  tracing::trace!("checking req limiter");
  if limiter.try_acquire(&client.ip().to_string()) {
    Ok(())
  } else {
    Err(ApiError::RateLimited)
  }
}

/// Reject a declared length over `max`, then read at most `max` bytes. A body
/// that runs past `max` while streaming is also too large; any other read
/// error is a read failure.
pub(crate) async fn read_body(req: Request, max: usize) -> Result<Bytes, ApiError> {
  tracing::trace!("checking content len");
  let declared = req
    .headers()
    .get(header::CONTENT_LENGTH)
    .and_then(|v| v.to_str().ok())
    .and_then(|s| s.parse::<u64>().ok());

  if let Some(length) = declared
    && length > max as u64
  {
    return Err(ApiError::BodyTooLarge { length: Some(length), max });
  }

  tracing::trace!("reading body");
  axum::body::to_bytes(req.into_body(), max)
    .await
    .map_err(|e| {
      if exceeds_limit(&e) {
        ApiError::BodyTooLarge { length: None, max }
      } else {
        ApiError::BodyRead(e)
      }
    })
}

fn exceeds_limit(e: &axum::Error) -> bool {
  std::iter::successors(e.source(), |inner| (*inner).source())
    .any(|inner| inner.is::<LengthLimitError>())
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
  tracing::trace!("unmarshaling json");
  serde_json::from_slice(body).map_err(ApiError::MalformedInput)
}

/// Log a failed request with its cause and context.
pub(crate) fn log_failure(endpoint: &'static str, e: &ApiError) {
  let cause = std::error::Error::source(e).map(ToString::to_string);
  match e {
    ApiError::BodyTooLarge { length, max } => tracing::warn!(
      endpoint,
      content_length = ?length,
      max_content_length = max,
      error = %e,
      "request rejected"
    ),
    ApiError::RecordNotFound(id) => tracing::warn!(
      endpoint,
      people_id = id,
      error = %e,
      "request rejected"
    ),
    _ => tracing::warn!(endpoint, error = %e, cause = ?cause, "request rejected"),
  }
}
