//! HTTP clients for the agify.io, genderize.io and nationalize.io prediction
//! services.
//!
//! Each service answers `GET {base_url}?name=<name>` with a small JSON
//! document; [`PredictionClient`] decodes it into the matching payload type
//! from [`persona_core::prediction`] and implements [`Predictor`].

pub mod client;
pub mod error;

pub use client::{
  AGIFY_URL, AgifyClient, GENDERIZE_URL, GenderizeClient, NATIONALIZE_URL,
  NationalizeClient, PredictionClient,
};
pub use error::{Error, Result};

#[doc(no_inline)]
pub use persona_core::prediction::Predictor;
