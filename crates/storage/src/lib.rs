//! The in-process storage backend
//!
//! This crate provides one conforming implementation of
//! `jsonstm_core::traits::Storage`: a `DashMap`-backed table of
//! `(JsonValue, u64)` records plus the single exclusive section the commit
//! protocol needs. Alternative backends (an embedded SQL table, a
//! remote KV service) can implement the same trait without either this
//! crate or `jsonstm-concurrency` changing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod sharded;

pub use sharded::ShardedStore;
