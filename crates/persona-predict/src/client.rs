//! [`PredictionClient`]: one typed client per prediction service.

use std::{marker::PhantomData, time::Duration};

use persona_core::prediction::{
  AgePrediction, GenderPrediction, NationalityPrediction, Predictor,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

pub const AGIFY_URL: &str = "https://api.agify.io";
pub const GENDERIZE_URL: &str = "https://api.genderize.io";
pub const NATIONALIZE_URL: &str = "https://api.nationalize.io";

pub type AgifyClient = PredictionClient<AgePrediction>;
pub type GenderizeClient = PredictionClient<GenderPrediction>;
pub type NationalizeClient = PredictionClient<NationalityPrediction>;

/// Async client for a single prediction service returning `T`.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug)]
pub struct PredictionClient<T> {
  client:   Client,
  service:  &'static str,
  base_url: String,
  _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for PredictionClient<T> {
  fn clone(&self) -> Self {
    Self {
      client:   self.client.clone(),
      service:  self.service,
      base_url: self.base_url.clone(),
      _payload: PhantomData,
    }
  }
}

impl<T> PredictionClient<T> {
  pub fn new(
    service: &'static str,
    base_url: impl Into<String>,
    timeout: Duration,
  ) -> Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|source| Error::Http { service, source })?;
    Ok(Self {
      client,
      service,
      base_url: base_url.into(),
      _payload: PhantomData,
    })
  }
}

impl AgifyClient {
  pub fn agify(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
    Self::new("agify", base_url, timeout)
  }
}

impl GenderizeClient {
  pub fn genderize(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
    Self::new("genderize", base_url, timeout)
  }
}

impl NationalizeClient {
  pub fn nationalize(
    base_url: impl Into<String>,
    timeout: Duration,
  ) -> Result<Self> {
    Self::new("nationalize", base_url, timeout)
  }
}

impl<T> PredictionClient<T>
where
  T: DeserializeOwned,
{
  /// `GET {base_url}?name=<name>`
  pub async fn get(&self, name: &str) -> Result<T> {
    let service = self.service;
    let http = |source| Error::Http { service, source };

    let resp = self
      .client
      .get(&self.base_url)
      .query(&[("name", name)])
      .send()
      .await
      .map_err(http)?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { service, status, body });
    }

    let payload = resp.json().await.map_err(http)?;
    tracing::debug!(service, name, "prediction received");
    Ok(payload)
  }
}

impl<T> Predictor for PredictionClient<T>
where
  T: DeserializeOwned + Send + 'static,
{
  type Output = T;
  type Error = Error;

  fn service(&self) -> &'static str { self.service }

  async fn predict(&self, name: &str) -> Result<T> { self.get(name).await }
}
