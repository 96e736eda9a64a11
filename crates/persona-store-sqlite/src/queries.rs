//! Statement-level operations on a single connection.
//!
//! Every function issues its statements one by one; none of them opens a
//! transaction. Callers that compose them (`insert_all`, `delete_all`) can
//! therefore leave partial state behind when a later statement fails.

use persona_core::person::{CombinedRecord, GenderRecord, NationalityRecord, Person};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::{
  Error, Result,
  encode::{RawCombined, encode_country_ids, encode_gender, encode_probabilities},
};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Whether an identity row with `p`'s natural key exists.
///
/// With a patronymic the match is exact. Without one the patronymic column is
/// ignored, so a row with any patronymic matches.
pub fn person_exists(conn: &Connection, p: &Person) -> Result<bool> {
  let exists = match &p.patronymic {
    Some(patronymic) => conn.query_row(
      "SELECT EXISTS(SELECT 1 FROM peoples
         WHERE name = ?1 AND surname = ?2 AND age = ?3 AND patronymic = ?4)",
      params![p.name, p.surname, p.age, patronymic],
      |r| r.get(0),
    )?,
    None => conn.query_row(
      "SELECT EXISTS(SELECT 1 FROM peoples
         WHERE name = ?1 AND surname = ?2 AND age = ?3)",
      params![p.name, p.surname, p.age],
      |r| r.get(0),
    )?,
  };
  Ok(exists)
}

pub fn person_id_exists(conn: &Connection, id: i64) -> Result<bool> {
  Ok(conn.query_row(
    "SELECT EXISTS(SELECT 1 FROM peoples WHERE people_id = ?1)",
    params![id],
    |r| r.get(0),
  )?)
}

/// Insert the identity row. `p.id == 0` lets SQLite assign the id.
pub fn insert_person(conn: &Connection, p: &Person) -> Result<i64> {
  let id = if p.id == 0 {
    conn.query_row(
      "INSERT INTO peoples (name, surname, age, patronymic)
       VALUES (?1, ?2, ?3, ?4)
       RETURNING people_id",
      params![p.name, p.surname, p.age, p.patronymic],
      |r| r.get(0),
    )?
  } else {
    conn.query_row(
      "INSERT INTO peoples (people_id, name, surname, age, patronymic)
       VALUES (?1, ?2, ?3, ?4, ?5)
       RETURNING people_id",
      params![p.id, p.name, p.surname, p.age, p.patronymic],
      |r| r.get(0),
    )?
  };
  Ok(id)
}

// ─── Children ────────────────────────────────────────────────────────────────

pub fn insert_gender(conn: &Connection, g: &GenderRecord) -> Result<()> {
  conn.execute(
    "INSERT INTO genders (people_id, gender, probability) VALUES (?1, ?2, ?3)",
    params![g.id, encode_gender(g.gender), g.probability],
  )?;
  Ok(())
}

pub fn insert_nationality(conn: &Connection, n: &NationalityRecord) -> Result<()> {
  let country_ids = encode_country_ids(n.country_ids())?;
  let probabilities = encode_probabilities(n.probabilities())?;
  conn.execute(
    "INSERT INTO nationalizations (people_id, country_id, probability)
     VALUES (?1, ?2, ?3)",
    params![n.id(), country_ids, probabilities],
  )?;
  Ok(())
}

// ─── Combined ────────────────────────────────────────────────────────────────

/// Existence check, then identity, gender and nationality inserts.
pub fn insert_all(conn: &Connection, record: CombinedRecord) -> Result<i64> {
  if person_exists(conn, &record.person)? {
    return Err(Error::DuplicateRecord);
  }

  let id = insert_person(conn, &record.person)?;
  let record = record.with_id(id);
  tracing::trace!(people_id = id, "identity row inserted");

  insert_gender(conn, &record.gender)?;
  insert_nationality(conn, &record.nationality)?;
  Ok(id)
}

/// Existence check, then gender, nationality and identity deletes.
pub fn delete_all(conn: &Connection, id: i64) -> Result<()> {
  if !person_id_exists(conn, id)? {
    return Err(Error::RecordNotFound(id));
  }

  conn.execute("DELETE FROM genders WHERE people_id = ?1", params![id])?;
  conn.execute("DELETE FROM nationalizations WHERE people_id = ?1", params![id])?;
  conn.execute("DELETE FROM peoples WHERE people_id = ?1", params![id])?;
  Ok(())
}

pub fn fetch_all(conn: &Connection, id: i64) -> Result<Option<CombinedRecord>> {
  let raw = conn
    .query_row(
      "SELECT
         p.people_id, p.name, p.surname, p.patronymic, p.age,
         g.gender, g.probability,
         n.country_id, n.probability
       FROM peoples p
       LEFT JOIN genders          g ON g.people_id = p.people_id
       LEFT JOIN nationalizations n ON n.people_id = p.people_id
       WHERE p.people_id = ?1",
      params![id],
      |row| {
        Ok(RawCombined {
          people_id:   row.get(0)?,
          name:        row.get(1)?,
          surname:     row.get(2)?,
          patronymic:  row.get(3)?,
          age:         row.get(4)?,
          gender:      row.get(5)?,
          g_prob:      row.get(6)?,
          country_ids: row.get(7)?,
          n_probs:     row.get(8)?,
        })
      },
    )
    .optional()?;

  raw.map(RawCombined::into_record).transpose()
}

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Number of rows in each of the three tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
  pub peoples:          u64,
  pub genders:          u64,
  pub nationalizations: u64,
}

impl RowCounts {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

pub fn row_counts(conn: &Connection) -> Result<RowCounts> {
  let count = |table: &str| -> Result<u64> {
    let n: i64 =
      conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
    Ok(n as u64)
  };
  Ok(RowCounts {
    peoples:          count("peoples")?,
    genders:          count("genders")?,
    nationalizations: count("nationalizations")?,
  })
}
