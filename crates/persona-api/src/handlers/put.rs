//! Create workflow: rate check → body → JSON → enrichment → insert.

use std::net::SocketAddr;

use axum::{
  Json,
  extract::{ConnectInfo, Request, State},
  http::StatusCode,
};
use persona_core::{aggregate::Enrich, person::CombinedRecord, store::PersonStore};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::{ApiError, NO_ERROR},
  handlers::{check_rate, log_failure, parse_json, read_body},
};

#[derive(Debug, Deserialize, Serialize)]
pub struct Input {
  pub name:       String,
  pub surname:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub patronymic: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Output {
  pub writed_id: i64,
  pub error:     String,
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

  match create(&state, client, req).await {
    Ok(id) => {
      let out = Output { writed_id: id, error: NO_ERROR.to_string() };
      tracing::debug!(output = ?out, "record created");
      (StatusCode::OK, Json(out))
    }
    Err(e) => {
      log_failure("put", &e);
      (e.status(), Json(Output { writed_id: 0, error: e.to_string() }))
    }
  }
}

async fn create<S, E>(
  state: &AppState<S, E>,
  client: SocketAddr,
  req: Request,
) -> Result<i64, ApiError>
where
  S: PersonStore + 'static,
  E: Enrich,
{
  check_rate(&state.put_limiter, client)?;
  let body = read_body(req, state.config.max_body_len).await?;
  let input: Input = parse_json(&body)?;
  tracing::debug!(
    input = ?input,
    is_patronymic = input.patronymic.is_some(),
    "input parsed"
  );

  let enrichment = state.enricher.enrich(&input.name).await?;

  let record =
    CombinedRecord::assemble(input.name, input.surname, input.patronymic, enrichment);
  tracing::trace!(record = ?record, "writing data to db");

  Ok(state.store.insert(record).await?)
}
