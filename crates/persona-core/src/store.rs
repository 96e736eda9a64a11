//! The `PersonStore` trait.
//!
//! Implemented by storage backends (e.g. `persona-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::{Result, person::CombinedRecord};

/// Abstraction over a persistence backend for combined records.
///
/// Neither write path is atomic: each step is its own statement, so a failure
/// partway through can leave a partial record behind. Such failures surface as
/// [`Error::Persistence`](crate::Error::Persistence) and are not repaired.
pub trait PersonStore: Send + Sync {
  /// Persist a combined record and return its identity id.
  ///
  /// Fails with [`Error::DuplicateRecord`](crate::Error::DuplicateRecord)
  /// before any write if the natural key already exists. A non-zero
  /// `record.person.id` is used as the identity id instead of a generated one.
  fn insert(
    &self,
    record: CombinedRecord,
  ) -> impl Future<Output = Result<i64>> + Send + '_;

  /// Delete the gender, nationality and identity rows of `id`, in that order.
  ///
  /// Fails with [`Error::RecordNotFound`](crate::Error::RecordNotFound) if no
  /// identity row has that id.
  fn delete(&self, id: i64) -> impl Future<Output = Result<()>> + Send + '_;

  /// Load a combined record. Returns `None` if the identity row is missing.
  fn fetch(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<CombinedRecord>>> + Send + '_;
}
