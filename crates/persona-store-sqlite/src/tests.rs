//! Integration tests for `SqliteStore` against an on-disk database in a
//! temporary directory.

use persona_core::{
  Error as CoreError,
  person::{CombinedRecord, NationalityRecord, Person},
  prediction::Gender,
  store::PersonStore,
};
use tempfile::TempDir;

use crate::{RowCounts, SqliteStore, StoreOptions, queries};

async fn store() -> (SqliteStore, TempDir) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = SqliteStore::open(dir.path().join("persona.db"), StoreOptions {
    max_size: 4,
    ..StoreOptions::default()
  })
  .await
  .expect("on-disk store");
  (store, dir)
}

fn record(name: &str, surname: &str, patronymic: Option<&str>, age: i64) -> CombinedRecord {
  CombinedRecord {
    person:      Person {
      id: 0,
      name: name.into(),
      surname: surname.into(),
      patronymic: patronymic.map(Into::into),
      age,
    },
    gender:      persona_core::person::GenderRecord {
      id:          0,
      gender:      Gender::Female,
      probability: 0.97,
    },
    nationality: NationalityRecord::new(
      0,
      vec!["US".into(), "GB".into(), "AU".into()],
      vec![0.31, 0.12, 0.07],
    )
    .unwrap(),
  }
}

fn ann() -> CombinedRecord { record("Ann", "Lee", None, 30) }

async fn counts(s: &SqliteStore) -> RowCounts { s.row_counts().await.unwrap() }

const ONE_OF_EACH: RowCounts = RowCounts { peoples: 1, genders: 1, nationalizations: 1 };

// ─── Insert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_assigns_id_and_fetch_returns_all_three_parts() {
  let (s, _dir) = store().await;

  let id = s.insert(ann()).await.unwrap();
  assert!(id > 0);

  let fetched = s.fetch(id).await.unwrap().expect("record exists");
  assert_eq!(fetched, ann().with_id(id));
  assert_eq!(counts(&s).await, ONE_OF_EACH);
}

#[tokio::test]
async fn nationality_order_and_alignment_survive_storage() {
  let (s, _dir) = store().await;
  let id = s.insert(ann()).await.unwrap();

  let n = s.fetch(id).await.unwrap().unwrap().nationality;
  assert_eq!(n.len(), 3);
  assert_eq!(
    n.pairs().collect::<Vec<_>>(),
    [("US", 0.31), ("GB", 0.12), ("AU", 0.07)]
  );
}

#[tokio::test]
async fn empty_nationality_list_is_stored() {
  let (s, _dir) = store().await;
  let mut r = ann();
  r.nationality = NationalityRecord::new(0, vec![], vec![]).unwrap();

  let id = s.insert(r).await.unwrap();
  assert!(s.fetch(id).await.unwrap().unwrap().nationality.is_empty());
}

#[tokio::test]
async fn caller_supplied_id_is_used() {
  let (s, _dir) = store().await;

  let id = s.insert(ann().with_id(4242)).await.unwrap();
  assert_eq!(id, 4242);
  assert_eq!(s.fetch(4242).await.unwrap().unwrap().gender.id, 4242);
}

// ─── Uniqueness ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_natural_key_is_rejected_without_writes() {
  let (s, _dir) = store().await;
  s.insert(ann()).await.unwrap();

  let err = s.insert(ann()).await.unwrap_err();
  assert!(matches!(err, CoreError::DuplicateRecord));
  assert_eq!(counts(&s).await, ONE_OF_EACH);
}

#[tokio::test]
async fn different_age_is_a_different_person() {
  let (s, _dir) = store().await;
  s.insert(ann()).await.unwrap();
  s.insert(record("Ann", "Lee", None, 31)).await.unwrap();
  assert_eq!(counts(&s).await.peoples, 2);
}

#[tokio::test]
async fn missing_patronymic_matches_any_patronymic() {
  let (s, _dir) = store().await;
  s.insert(record("Ann", "Lee", Some("Marie"), 30)).await.unwrap();

  let err = s.insert(ann()).await.unwrap_err();
  assert!(matches!(err, CoreError::DuplicateRecord));
}

#[tokio::test]
async fn present_patronymic_matches_exactly() {
  let (s, _dir) = store().await;
  s.insert(ann()).await.unwrap();

  // The stored row has no patronymic, so an exact match on one fails.
  s.insert(record("Ann", "Lee", Some("Marie"), 30)).await.unwrap();
  let err = s.insert(record("Ann", "Lee", Some("Marie"), 30)).await.unwrap_err();
  assert!(matches!(err, CoreError::DuplicateRecord));
  assert_eq!(counts(&s).await.peoples, 2);
}

#[tokio::test]
async fn check_then_insert_is_not_race_free() {
  // Two creates that both pass the existence check before either inserts
  // produce two identity rows for the same natural key.
  let (s, _dir) = store().await;
  let person = ann().person;

  for _ in 0..2 {
    let p = person.clone();
    let exists = s.call(move |conn| queries::person_exists(conn, &p)).await.unwrap();
    assert!(!exists);
  }
  for _ in 0..2 {
    let p = person.clone();
    s.call(move |conn| queries::insert_person(conn, &p)).await.unwrap();
  }

  assert_eq!(counts(&s).await.peoples, 2);
}

// ─── Partial writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn failure_after_identity_insert_leaves_orphan() {
  let (s, _dir) = store().await;
  s.call(|conn| Ok(conn.execute_batch("DROP TABLE nationalizations")?))
    .await
    .unwrap();

  let err = s.insert(ann()).await.unwrap_err();
  assert!(matches!(err, CoreError::Persistence(_)));

  let (peoples, genders) = s
    .call(|conn| {
      let p: i64 = conn.query_row("SELECT COUNT(*) FROM peoples", [], |r| r.get(0))?;
      let g: i64 = conn.query_row("SELECT COUNT(*) FROM genders", [], |r| r.get(0))?;
      Ok((p, g))
    })
    .await
    .unwrap();
  assert_eq!((peoples, genders), (1, 1));
}

#[tokio::test]
async fn colliding_supplied_id_fails_before_children() {
  let (s, _dir) = store().await;
  let id = s.insert(ann()).await.unwrap();

  let err = s.insert(record("Bo", "Kim", None, 41).with_id(id)).await.unwrap_err();
  assert!(matches!(err, CoreError::Persistence(_)));
  assert_eq!(counts(&s).await, ONE_OF_EACH);
}

#[tokio::test]
async fn orphaned_identity_fails_to_fetch() {
  let (s, _dir) = store().await;
  let id = s
    .call(|conn| queries::insert_person(conn, &ann().person))
    .await
    .unwrap();

  assert!(matches!(s.fetch(id).await, Err(CoreError::Persistence(_))));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_only_that_record() {
  let (s, _dir) = store().await;
  let keep = s.insert(ann()).await.unwrap();
  let gone = s.insert(record("Bo", "Kim", None, 41)).await.unwrap();

  s.delete(gone).await.unwrap();

  assert!(s.fetch(gone).await.unwrap().is_none());
  assert!(s.fetch(keep).await.unwrap().is_some());
  assert_eq!(counts(&s).await, ONE_OF_EACH);
}

#[tokio::test]
async fn delete_nonexistent_is_not_found_and_changes_nothing() {
  let (s, _dir) = store().await;
  s.insert(ann()).await.unwrap();

  let err = s.delete(999_999).await.unwrap_err();
  assert!(matches!(err, CoreError::RecordNotFound(999_999)));
  assert_eq!(counts(&s).await, ONE_OF_EACH);
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
  let (s, _dir) = store().await;
  let id = s.insert(ann()).await.unwrap();

  s.delete(id).await.unwrap();
  assert!(matches!(s.delete(id).await, Err(CoreError::RecordNotFound(_))));
}

#[tokio::test]
async fn failed_delete_step_leaves_partial_record() {
  let (s, _dir) = store().await;
  let id = s.insert(ann()).await.unwrap();
  s.call(|conn| Ok(conn.execute_batch("DROP TABLE nationalizations")?))
    .await
    .unwrap();

  let err = s.delete(id).await.unwrap_err();
  assert!(matches!(err, CoreError::Persistence(_)));

  // Gender row went first; the identity row is still there.
  let (peoples, genders) = s
    .call(|conn| {
      let p: i64 = conn.query_row("SELECT COUNT(*) FROM peoples", [], |r| r.get(0))?;
      let g: i64 = conn.query_row("SELECT COUNT(*) FROM genders", [], |r| r.get(0))?;
      Ok((p, g))
    })
    .await
    .unwrap();
  assert_eq!((peoples, genders), (1, 0));
}

#[tokio::test]
async fn insert_then_delete_leaves_no_rows() {
  let (s, _dir) = store().await;
  let before = counts(&s).await;

  let id = s.insert(ann()).await.unwrap();
  s.delete(id).await.unwrap();

  assert_eq!(counts(&s).await, before);
  assert!(counts(&s).await.is_empty());
}

// ─── Pool & schema ───────────────────────────────────────────────────────────

#[tokio::test]
async fn connections_are_released_after_every_outcome() {
  let (s, _dir) = store().await;

  for i in 0..12 {
    let _ = match i % 4 {
      0 => s.insert(record("P", &i.to_string(), None, 20)).await.map(drop),
      1 => s.insert(record("P", &(i - 1).to_string(), None, 20)).await.map(drop),
      2 => s.delete(999_999).await,
      _ => s.fetch(i).await.map(drop),
    };
    assert!(s.pool_state().is_quiescent(), "leak after call {i}");
  }
  assert_eq!(s.pool_state().connections, s.pool_state().idle_connections);
}

#[tokio::test]
async fn connections_are_released_after_persistence_failures() {
  let (s, _dir) = store().await;
  let id = s.insert(ann()).await.unwrap();
  s.call(|conn| Ok(conn.execute_batch("DROP TABLE genders")?))
    .await
    .unwrap();

  let err = s.insert(record("Bob", "Ray", None, 41)).await.unwrap_err();
  assert!(matches!(err, CoreError::Persistence(_)));
  assert!(s.pool_state().is_quiescent(), "leak after failed insert");

  let err = s.delete(id).await.unwrap_err();
  assert!(matches!(err, CoreError::Persistence(_)));
  assert!(s.pool_state().is_quiescent(), "leak after failed delete");

  assert!(s.fetch(id).await.is_err());
  assert!(s.pool_state().is_quiescent(), "leak after failed fetch");
}

#[tokio::test]
async fn reopen_keeps_data_unless_forced() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("persona.db");

  let s = SqliteStore::open(&path, StoreOptions::default()).await.unwrap();
  s.insert(ann()).await.unwrap();
  drop(s);

  let s = SqliteStore::open(&path, StoreOptions::default()).await.unwrap();
  assert_eq!(counts(&s).await, ONE_OF_EACH);
  drop(s);

  let s = SqliteStore::open(&path, StoreOptions {
    force_drop: true,
    ..StoreOptions::default()
  })
  .await
  .unwrap();
  assert!(counts(&s).await.is_empty());
}
