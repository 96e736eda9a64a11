//! HTTP layer for the persona enrichment service.
//!
//! Exposes an axum [`Router`] with two endpoints:
//!
//! | Path   | Body | Response |
//! |--------|------|----------|
//! | `/put` | `{"name", "surname", "patronymic"?}` | `{"writed_id", "error"}` |
//! | `/del` | `{"delete_id"}` | `{"error"}` |
//!
//! `error` is the string `"null"` on success. Handlers are generic over any
//! [`PersonStore`] and [`Enrich`] implementation; [`AppState::start`] wires
//! the production ones.

pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;

pub use config::ServerConfig;
pub use error::{ApiError, StartError};

use std::{net::SocketAddr, sync::Arc};

use axum::{
  Router,
  body::Body,
  extract::ConnectInfo,
  http::Request,
  routing::post,
};
use persona_core::{aggregate::{Aggregator, Enrich}, store::PersonStore};
use persona_predict::{AgifyClient, GenderizeClient, NationalizeClient};
use persona_store_sqlite::{SqliteStore, StoreOptions};
use tower_http::trace::TraceLayer;
use tracing::Span;
use uuid::Uuid;

use handlers::{del, put};
use limiter::RateLimiter;

/// The production enricher: the three HTTP prediction clients.
pub type HttpAggregator = Aggregator<AgifyClient, GenderizeClient, NationalizeClient>;

// ─── Application state ────────────────────────────────────────────────────────

/// Process-wide collaborators shared by both endpoints.
///
/// Each endpoint has its own limiter, so quotas are counted per endpoint.
pub struct AppState<S, E> {
  pub store:       Arc<S>,
  pub enricher:    Arc<E>,
  pub put_limiter: Arc<RateLimiter>,
  pub del_limiter: Arc<RateLimiter>,
  pub config:      Arc<ServerConfig>,
}

impl<S, E> Clone for AppState<S, E> {
  fn clone(&self) -> Self {
    Self {
      store:       Arc::clone(&self.store),
      enricher:    Arc::clone(&self.enricher),
      put_limiter: Arc::clone(&self.put_limiter),
      del_limiter: Arc::clone(&self.del_limiter),
      config:      Arc::clone(&self.config),
    }
  }
}

impl<S, E> AppState<S, E> {
  /// Assemble state from ready collaborators; limiters come from `config`.
  pub fn new(store: S, enricher: E, config: ServerConfig) -> Self {
    Self {
      store:       Arc::new(store),
      enricher:    Arc::new(enricher),
      put_limiter: Arc::new(RateLimiter::per_hour(config.limit_per_hour)),
      del_limiter: Arc::new(RateLimiter::per_hour(config.limit_per_hour)),
      config:      Arc::new(config),
    }
  }

  /// Release this handle to the collaborators.
  ///
  /// The pool closes when the last handle is dropped, so call this after the
  /// server future has returned and the router's clones are gone.
  pub fn stop(self) {
    let others = Arc::strong_count(&self.store) - 1;
    drop(self);
    if others > 0 {
      tracing::warn!(others, "state released while other handles remain");
      return;
    }
    tracing::info!(endpoint = "put", "endpoint stopped");
    tracing::info!(endpoint = "del", "endpoint stopped");
  }
}

impl AppState<SqliteStore, HttpAggregator> {
  /// Open the store and build the prediction clients described by `config`.
  pub async fn start(config: ServerConfig) -> Result<Self, StartError> {
    tracing::trace!("creating db connection");
    let store = SqliteStore::open(&config.store_path, StoreOptions {
      max_size: config.pool_size,
      force_drop: config.force_drop,
      ..StoreOptions::default()
    })
    .await?;

    tracing::trace!("creating agify, genderize and nationalize clients");
    let timeout = config.request_timeout();
    let enricher = Aggregator::new(
      AgifyClient::agify(&config.agify_url, timeout)?,
      GenderizeClient::genderize(&config.genderize_url, timeout)?,
      NationalizeClient::nationalize(&config.nationalize_url, timeout)?,
    );

    let state = Self::new(store, enricher, config);
    tracing::info!(endpoint = "put", "endpoint started");
    tracing::info!(endpoint = "del", "endpoint started");
    Ok(state)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] serving `POST /put` and `POST /del`.
pub fn router<S, E>(state: AppState<S, E>) -> Router
where
  S: PersonStore + 'static,
  E: Enrich,
{
  Router::new()
    .route("/put", post(put::handler::<S, E>))
    .route("/del", post(del::handler::<S, E>))
    .layer(TraceLayer::new_for_http().make_span_with(request_span))
    .with_state(state)
}

/// One span per request, tagged with a fresh id and the client address.
fn request_span(req: &Request<Body>) -> Span {
  let client = req
    .extensions()
    .get::<ConnectInfo<SocketAddr>>()
    .map(|ConnectInfo(addr)| addr.ip().to_string())
    .unwrap_or_default();
  tracing::info_span!(
    "request",
    request_id = %Uuid::new_v4(),
    method = %req.method(),
    uri = %req.uri(),
    client = %client,
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────
