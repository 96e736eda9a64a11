//! Delete workflow: rate check → body → JSON → guarded delete.

use std::net::SocketAddr;

use axum::{
  Json,
  extract::{ConnectInfo, Request, State},
  http::StatusCode,
};
use persona_core::{aggregate::Enrich, store::PersonStore};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::{ApiError, NO_ERROR},
  handlers::{check_rate, log_failure, parse_json, read_body},
};

#[derive(Debug, Deserialize, Serialize)]
pub struct Input {
  pub delete_id: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Output {
  pub error: String,
}

pub async fn handler<S, E>(
  State(state): State<AppState<S, E>>,
  ConnectInfo(client): ConnectInfo<SocketAddr>,
  req: Request,
) -> (StatusCode, Json<Output>)
where
  S: PersonStore + 'static,
  E: Enrich,
{
  tracing::info!("connected");

  match remove(&state, client, req).await {
    Ok(id) => {
      tracing::debug!(people_id = id, "record deleted");
      (StatusCode::OK, Json(Output { error: NO_ERROR.to_string() }))
    }
    Err(e) => {
      log_failure("del", &e);
      (e.status(), Json(Output { error: e.to_string() }))
    }
  }
}

async fn remove<S, E>(
  state: &AppState<S, E>,
  client: SocketAddr,
  req: Request,
) -> Result<i64, ApiError>
where
  S: PersonStore + 'static,
  E: Enrich,
{
  check_rate(&state.del_limiter, client)?;
  let body = read_body(req, state.config.max_body_len).await?;
  let input: Input = parse_json(&body)?;

  tracing::trace!(people_id = input.delete_id, "deleting data from db");
  state.store.delete(input.delete_id).await?;
  Ok(input.delete_id)
}
