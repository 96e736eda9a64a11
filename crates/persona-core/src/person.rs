//! The combined record: an identity row plus its gender and nationality
//! predictions, all sharing one identity id.
//!
//! An id of `0` means "not yet assigned"; the store assigns one on insert.

use serde::Serialize;

use crate::{
  Error, Result,
  aggregate::Enrichment,
  prediction::{CountryProbability, Gender},
};

/// The identity row. `(name, surname, age, patronymic)` is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
  pub id:         i64,
  pub name:       String,
  pub surname:    String,
  pub patronymic: Option<String>,
  pub age:        i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderRecord {
  pub id:          i64,
  pub gender:      Gender,
  pub probability: f64,
}

/// Candidate countries and their probabilities as two parallel sequences.
///
/// The sequences always have the same length; index `i` of one corresponds to
/// index `i` of the other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalityRecord {
  id:            i64,
  country_ids:   Vec<String>,
  probabilities: Vec<f64>,
}

impl NationalityRecord {
  pub fn new(
    id: i64,
    country_ids: Vec<String>,
    probabilities: Vec<f64>,
  ) -> Result<Self> {
    if country_ids.len() != probabilities.len() {
      return Err(Error::MisalignedNationality {
        countries:     country_ids.len(),
        probabilities: probabilities.len(),
      });
    }
    Ok(Self { id, country_ids, probabilities })
  }

  /// Split service candidates into the two aligned sequences, keeping order.
  pub fn from_countries(id: i64, countries: &[CountryProbability]) -> Self {
    let (country_ids, probabilities) = countries
      .iter()
      .map(|c| (c.country_id.clone(), c.probability))
      .unzip();
    Self { id, country_ids, probabilities }
  }

  pub fn id(&self) -> i64 { self.id }

  pub fn country_ids(&self) -> &[String] { &self.country_ids }

  pub fn probabilities(&self) -> &[f64] { &self.probabilities }

  pub fn len(&self) -> usize { self.country_ids.len() }

  pub fn is_empty(&self) -> bool { self.country_ids.is_empty() }

  /// `(country_id, probability)` pairs in stored order.
  pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
    self
      .country_ids
      .iter()
      .map(String::as_str)
      .zip(self.probabilities.iter().copied())
  }
}

/// The identity/gender/nationality triple created and deleted together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRecord {
  pub person:      Person,
  pub gender:      GenderRecord,
  pub nationality: NationalityRecord,
}

impl CombinedRecord {
  /// Assemble an unassigned record from request fields and predictions.
  pub fn assemble(
    name: String,
    surname: String,
    patronymic: Option<String>,
    enrichment: Enrichment,
  ) -> Self {
    Self {
      person:      Person { id: 0, name, surname, patronymic, age: enrichment.age },
      gender:      GenderRecord {
        id:          0,
        gender:      enrichment.gender,
        probability: enrichment.gender_probability,
      },
      nationality: NationalityRecord::from_countries(0, &enrichment.countries),
    }
  }

  pub fn id(&self) -> i64 { self.person.id }

  /// Stamp `id` onto all three parts.
  pub fn with_id(mut self, id: i64) -> Self {
    self.person.id = id;
    self.gender.id = id;
    self.nationality.id = id;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn enrichment() -> Enrichment {
    Enrichment {
      age:                30,
      gender:             Gender::Female,
      gender_probability: 0.97,
      countries:          vec![
        CountryProbability { country_id: "US".into(), probability: 0.4 },
        CountryProbability { country_id: "GB".into(), probability: 0.1 },
      ],
    }
  }

  #[test]
  fn misaligned_sequences_are_rejected() {
    let err =
      NationalityRecord::new(1, vec!["US".into(), "GB".into()], vec![0.5])
        .unwrap_err();
    assert!(matches!(
      err,
      Error::MisalignedNationality { countries: 2, probabilities: 1 }
    ));
  }

  #[test]
  fn from_countries_keeps_order_and_alignment() {
    let n = NationalityRecord::from_countries(0, &enrichment().countries);
    assert_eq!(n.country_ids(), ["US", "GB"]);
    assert_eq!(n.probabilities(), [0.4, 0.1]);
    assert_eq!(n.pairs().collect::<Vec<_>>(), [("US", 0.4), ("GB", 0.1)]);
  }

  #[test]
  fn assemble_then_stamp_id() {
    let record =
      CombinedRecord::assemble("Ann".into(), "Lee".into(), None, enrichment());
    assert_eq!(record.id(), 0);
    assert_eq!(record.person.age, 30);

    let record = record.with_id(7);
    assert_eq!(record.person.id, 7);
    assert_eq!(record.gender.id, 7);
    assert_eq!(record.nationality.id(), 7);
  }
}
