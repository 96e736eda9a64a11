//! SQL schema for the persona SQLite store.
//!
//! Applied once when the pool is opened. `PRAGMA user_version` records the
//! schema version for future migrations.

/// Per-connection settings, run by the pool on every new connection.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous  = NORMAL;
PRAGMA busy_timeout = 5000;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// There is no UNIQUE constraint on the natural key and no cascading foreign
/// key: duplicates are guarded by an existence check in application code and
/// child rows are deleted explicitly.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS peoples (
    people_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    surname     TEXT    NOT NULL,
    patronymic  TEXT,
    age         INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS genders (
    people_id   INTEGER NOT NULL,
    gender      TEXT    NOT NULL,   -- 'male' | 'female' | 'unknown'
    probability REAL    NOT NULL
);

-- Two index-aligned JSON arrays.
CREATE TABLE IF NOT EXISTS nationalizations (
    people_id   INTEGER NOT NULL,
    country_id  TEXT    NOT NULL DEFAULT '[]',
    probability TEXT    NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS peoples_key_idx            ON peoples(name, surname, age);
CREATE INDEX IF NOT EXISTS genders_people_idx         ON genders(people_id);
CREATE INDEX IF NOT EXISTS nationalizations_people_idx ON nationalizations(people_id);

PRAGMA user_version = 1;
";

/// Drops every table, children first.
pub const DROP: &str = "
DROP TABLE IF EXISTS nationalizations;
DROP TABLE IF EXISTS genders;
DROP TABLE IF EXISTS peoples;

PRAGMA user_version = 0;
";

/// Bring the schema up to date, optionally dropping everything first.
pub fn migrate(conn: &rusqlite::Connection, force_drop: bool) -> rusqlite::Result<()> {
  if force_drop {
    tracing::warn!("dropping all tables before migration");
    conn.execute_batch(DROP)?;
  }
  conn.execute_batch(SCHEMA)?;
  let version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
  tracing::debug!(version, "schema migrated");
  Ok(())
}
