//! Fan-out/fan-in over the three prediction services.
//!
//! Each branch runs on its own task and delivers its outcome into a dedicated
//! oneshot slot. The slots are read in a fixed order (age, gender,
//! nationality) and all three are awaited before any outcome is inspected, so
//! a failing branch never cancels its siblings.

use std::{future::Future, sync::Arc};

use serde::Serialize;
use tokio::sync::oneshot;

use crate::{
  Error, Result,
  prediction::{
    AgePrediction, CountryProbability, Gender, GenderPrediction,
    NationalityPrediction, Predictor,
  },
};

/// The merged output of all three branches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrichment {
  pub age:                i64,
  pub gender:             Gender,
  pub gender_probability: f64,
  /// Candidate countries in the order the nationality service returned them.
  pub countries:          Vec<CountryProbability>,
}

/// Something that can turn a name into an [`Enrichment`].
///
/// The HTTP layer depends on this rather than on [`Aggregator`]'s three type
/// parameters.
pub trait Enrich: Send + Sync + 'static {
  fn enrich(&self, name: &str) -> impl Future<Output = Result<Enrichment>> + Send;
}

/// Runs the age, gender and nationality predictors concurrently.
pub struct Aggregator<A, G, N> {
  age:         Arc<A>,
  gender:      Arc<G>,
  nationality: Arc<N>,
}

impl<A, G, N> Aggregator<A, G, N>
where
  A: Predictor<Output = AgePrediction>,
  G: Predictor<Output = GenderPrediction>,
  N: Predictor<Output = NationalityPrediction>,
{
  pub fn new(age: A, gender: G, nationality: N) -> Self {
    Self {
      age:         Arc::new(age),
      gender:      Arc::new(gender),
      nationality: Arc::new(nationality),
    }
  }

  /// Query all three services for `name` and merge the results.
  ///
  /// Returns [`Error::ExternalService`] if any branch failed; when several
  /// failed, the first in age/gender/nationality order is the one logged.
  pub async fn aggregate(&self, name: &str) -> Result<Enrichment> {
    let age_slot = spawn_branch(Arc::clone(&self.age), name);
    let gender_slot = spawn_branch(Arc::clone(&self.gender), name);
    let nationality_slot = spawn_branch(Arc::clone(&self.nationality), name);

    let age = age_slot.await;
    let gender = gender_slot.await;
    let nationality = nationality_slot.await;

    let age = settle(self.age.service(), age)?;
    let gender = settle(self.gender.service(), gender)?;
    let nationality = settle(self.nationality.service(), nationality)?;

    Ok(Enrichment {
      age:                age.age.unwrap_or_default(),
      gender:             gender.gender.unwrap_or_default(),
      gender_probability: gender.probability,
      countries:          nationality.countries,
    })
  }
}

impl<A, G, N> Enrich for Aggregator<A, G, N>
where
  A: Predictor<Output = AgePrediction>,
  G: Predictor<Output = GenderPrediction>,
  N: Predictor<Output = NationalityPrediction>,
{
  async fn enrich(&self, name: &str) -> Result<Enrichment> {
    self.aggregate(name).await
  }
}

type Slot<P> =
  oneshot::Receiver<Result<<P as Predictor>::Output, <P as Predictor>::Error>>;

fn spawn_branch<P: Predictor>(predictor: Arc<P>, name: &str) -> Slot<P> {
  let (tx, rx) = oneshot::channel();
  let name = name.to_owned();
  tokio::spawn(async move {
    tracing::trace!(service = predictor.service(), "requesting prediction");
    let outcome = predictor.predict(&name).await;
    // Only fails if the aggregating request was dropped.
    let _ = tx.send(outcome);
  });
  rx
}

fn settle<T, E>(
  service: &'static str,
  outcome: Result<Result<T, E>, oneshot::error::RecvError>,
) -> Result<T>
where
  E: std::error::Error,
{
  match outcome {
    Ok(Ok(value)) => Ok(value),
    Ok(Err(e)) => {
      tracing::warn!(service, error = %e, "prediction service error");
      Err(Error::ExternalService)
    }
    Err(_) => {
      tracing::warn!(service, "prediction task ended without a result");
      Err(Error::ExternalService)
    }
  }
}
