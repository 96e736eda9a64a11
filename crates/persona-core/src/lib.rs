//! Core types and trait definitions for the persona enrichment service.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! prediction clients, the SQLite store and the HTTP layer all depend on it.

// Native `async fn` in impls of the traits below is intended; the trait
// declarations spell out `Send` on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod error;
pub mod person;
pub mod prediction;
pub mod store;

pub use error::{Error, Result};
