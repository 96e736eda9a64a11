//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Gender is stored as a lowercase word. The two nationality sequences are
//! stored as compact JSON arrays, one per column.

use persona_core::{
  person::{CombinedRecord, GenderRecord, NationalityRecord, Person},
  prediction::Gender,
};

use crate::{Error, Result};

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str {
  match g {
    Gender::Male => "male",
    Gender::Female => "female",
    Gender::Unknown => "unknown",
  }
}

pub fn decode_gender(s: &str) -> Result<Gender> {
  match s {
    "male" => Ok(Gender::Male),
    "female" => Ok(Gender::Female),
    "unknown" => Ok(Gender::Unknown),
    other => Err(Error::Decode(format!("unknown gender: {other:?}"))),
  }
}

// ─── Nationality sequences ───────────────────────────────────────────────────

pub fn encode_country_ids(ids: &[String]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn encode_probabilities(ps: &[f64]) -> Result<String> {
  Ok(serde_json::to_string(ps)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from `peoples` joined with its two child tables.
///
/// The child columns are optional so that an orphaned identity row can still
/// be read back.
pub struct RawCombined {
  pub people_id:   i64,
  pub name:        String,
  pub surname:     String,
  pub patronymic:  Option<String>,
  pub age:         i64,
  pub gender:      Option<String>,
  pub g_prob:      Option<f64>,
  pub country_ids: Option<String>,
  pub n_probs:     Option<String>,
}

impl RawCombined {
  /// Decode into a [`CombinedRecord`]. A missing child row is a decode error:
  /// the record is incomplete.
  pub fn into_record(self) -> Result<CombinedRecord> {
    let id = self.people_id;
    let incomplete =
      |table: &str| Error::Decode(format!("record {id} has no {table} row"));

    let gender = decode_gender(&self.gender.ok_or_else(|| incomplete("genders"))?)?;
    let probability = self.g_prob.ok_or_else(|| incomplete("genders"))?;

    let country_ids: Vec<String> = serde_json::from_str(
      &self.country_ids.ok_or_else(|| incomplete("nationalizations"))?,
    )?;
    let probabilities: Vec<f64> = serde_json::from_str(
      &self.n_probs.ok_or_else(|| incomplete("nationalizations"))?,
    )?;

    Ok(CombinedRecord {
      person:      Person {
        id,
        name: self.name,
        surname: self.surname,
        patronymic: self.patronymic,
        age: self.age,
      },
      gender:      GenderRecord { id, gender, probability },
      nationality: NationalityRecord::new(id, country_ids, probabilities)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gender_words_roundtrip() {
    for g in [Gender::Male, Gender::Female, Gender::Unknown] {
      assert_eq!(decode_gender(encode_gender(g)).unwrap(), g);
    }
    assert!(decode_gender("other").is_err());
  }

  #[test]
  fn misaligned_columns_fail_to_decode() {
    let raw = RawCombined {
      people_id:   1,
      name:        "Ann".into(),
      surname:     "Lee".into(),
      patronymic:  None,
      age:         30,
      gender:      Some("female".into()),
      g_prob:      Some(0.9),
      country_ids: Some(r#"["US","GB"]"#.into()),
      n_probs:     Some("[0.5]".into()),
    };
    assert!(matches!(
      raw.into_record(),
      Err(Error::Core(persona_core::Error::MisalignedNationality { .. }))
    ));
  }
}
