//! [`SqliteStore`]: the SQLite implementation of [`PersonStore`].

use std::{path::Path, time::Duration};

use persona_core::{person::CombinedRecord, store::PersonStore};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::{
  Result,
  queries::{self, RowCounts},
  schema::{CONNECTION_PRAGMAS, migrate},
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Pool and migration settings for [`SqliteStore::open`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
  /// Maximum connections in the pool.
  pub max_size:           u32,
  /// How long a call waits for a free connection.
  pub connection_timeout: Duration,
  /// Drop all tables before applying the schema.
  pub force_drop:         bool,
}

impl Default for StoreOptions {
  fn default() -> Self {
    Self {
      max_size:           10,
      connection_timeout: Duration::from_secs(30),
      force_drop:         false,
    }
  }
}

/// Pool statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
  /// Total connections (checked out + idle).
  pub connections:      u32,
  pub idle_connections: u32,
}

impl PoolState {
  /// No connection is currently checked out.
  pub fn is_quiescent(&self) -> bool { self.connections == self.idle_connections }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A persona store backed by a single SQLite file.
///
/// Cloning is cheap: the pool is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, build the pool and migrate.
  pub async fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
    let path = path.as_ref().to_path_buf();

    let pool = tokio::task::spawn_blocking(move || -> Result<_> {
      let manager = SqliteConnectionManager::file(&path)
        .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

      let pool = Pool::builder()
        .max_size(options.max_size)
        .connection_timeout(options.connection_timeout)
        .build(manager)?;

      let conn = pool.get()?;
      migrate(&conn, options.force_drop)?;
      tracing::info!(
        path = %path.display(),
        max_size = options.max_size,
        "database pool created"
      );
      Ok(pool)
    })
    .await??;

    Ok(Self { pool })
  }

  /// Check out a connection, run `f` on a blocking thread, and return the
  /// connection to the pool whatever `f` returns.
  pub(crate) async fn call<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let pool = self.pool.clone();
    tokio::task::spawn_blocking(move || {
      let conn = pool.get()?;
      f(&*conn)
    })
    .await?
  }

  pub fn pool_state(&self) -> PoolState {
    let state = self.pool.state();
    PoolState {
      connections:      state.connections,
      idle_connections: state.idle_connections,
    }
  }

  /// Row counts of the three tables.
  pub async fn row_counts(&self) -> Result<RowCounts> {
    self.call(queries::row_counts).await
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  async fn insert(&self, record: CombinedRecord) -> persona_core::Result<i64> {
    let id = self.call(move |conn| queries::insert_all(conn, record)).await?;
    tracing::debug!(people_id = id, "combined record inserted");
    Ok(id)
  }

  async fn delete(&self, id: i64) -> persona_core::Result<()> {
    self.call(move |conn| queries::delete_all(conn, id)).await?;
    tracing::debug!(people_id = id, "combined record deleted");
    Ok(())
  }

  async fn fetch(&self, id: i64) -> persona_core::Result<Option<CombinedRecord>> {
    Ok(self.call(move |conn| queries::fetch_all(conn, id)).await?)
  }
}
