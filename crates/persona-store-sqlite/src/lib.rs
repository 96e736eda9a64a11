//! SQLite backend for the persona store.
//!
//! Connections come from an [`r2d2`] pool; every store call checks one out on
//! a blocking thread, runs its statements, and returns it to the pool when the
//! call finishes, on success and error alike.

mod encode;
mod queries;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use queries::RowCounts;
pub use store::{PoolState, SqliteStore, StoreOptions};

#[cfg(test)]
mod tests;
