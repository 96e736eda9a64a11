//! Prediction payloads and the [`Predictor`] abstraction over the three
//! external prediction services (age, gender, nationality).
//!
//! The payload types mirror the JSON returned by agify.io, genderize.io and
//! nationalize.io so clients can decode responses straight into them.

use std::future::Future;

use serde::{Deserialize, Serialize};

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  /// The service had no prediction for the name.
  #[default]
  Unknown,
}

// ─── Payloads ────────────────────────────────────────────────────────────────

/// Response of the age service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgePrediction {
  #[serde(default)]
  pub count: u64,
  #[serde(default)]
  pub name:  String,
  /// `None` when the service has never seen the name.
  #[serde(default)]
  pub age:   Option<i64>,
}

/// Response of the gender service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderPrediction {
  #[serde(default)]
  pub count:       u64,
  #[serde(default)]
  pub name:        String,
  #[serde(default)]
  pub gender:      Option<Gender>,
  #[serde(default)]
  pub probability: f64,
}

/// One candidate country for a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryProbability {
  pub country_id:  String,
  pub probability: f64,
}

/// Response of the nationality service. Candidates keep the service's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalityPrediction {
  #[serde(default)]
  pub count:   u64,
  #[serde(default)]
  pub name:    String,
  #[serde(default, rename = "country")]
  pub countries: Vec<CountryProbability>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A single external prediction service: `name -> prediction`.
///
/// Timeouts and retries are the implementor's concern; callers make exactly
/// one attempt.
pub trait Predictor: Send + Sync + 'static {
  type Output: Send + 'static;
  type Error: std::error::Error + Send + Sync + 'static;

  /// Short service name used in logs (e.g. `"agify"`).
  fn service(&self) -> &'static str;

  fn predict(
    &self,
    name: &str,
  ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}
