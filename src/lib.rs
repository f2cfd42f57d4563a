//! # jsonstm
//!
//! Software transactional memory over a collection of named, versioned JSON
//! documents ("tvars"). Client code composes arbitrary read/write sequences
//! against tvars inside a closure; `Store::atomically` runs that closure,
//! detects conflicts with other concurrently committing transactions via
//! optimistic concurrency control, and transparently retries until it
//! commits or a retry ceiling is reached.
//!
//! # Quick start
//!
//! ```
//! use jsonstm::{JsonValue, Store, StoreOptions};
//!
//! # fn main() -> jsonstm::Result<()> {
//! let store = Store::open(StoreOptions::default())?;
//! store.new_tvar("counter", JsonValue::from(0i64))?;
//!
//! let next = store.atomically(|tx| {
//!     let n = tx.read_tvar("counter")?.as_value().as_i64().unwrap();
//!     tx.write_tvar("counter", JsonValue::from(n + 1));
//!     Ok(n + 1)
//! })?;
//! assert_eq!(next, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # What this crate does not do
//!
//! No long-running transactions spanning I/O, no nested transactions with
//! independent all-or-nothing commit, no `retry`/`orElse`-style blocking
//! composition, no durability guarantees beyond the backing `Storage` impl,
//! no cross-process coordination, no schema enforcement on tvar values
//! beyond "JSON document". See `jsonstm_concurrency` and `jsonstm_storage`
//! for the pieces that make this up; this crate is only the assembled
//! public surface.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod registry;

use std::path::PathBuf;
use std::sync::Arc;

pub use jsonstm_concurrency::{CommitOutcome, ReadEntry, RetryPolicy, TransactionContext, WritePlan};
pub use jsonstm_core::error::{user_error, Aborted, Result, StmError};
pub use jsonstm_core::json::{JsonPath, JsonValue, PathSegment};
pub use jsonstm_core::key::{validate_id, validate_id_with_limits, IdError};
pub use jsonstm_core::limits::{LimitError, Limits};
pub use jsonstm_core::traits::Storage;
pub use jsonstm_storage::ShardedStore;

/// A closure receives `&mut Tx` as the only way to touch tvars during a
/// transaction attempt.
pub type Tx = TransactionContext;

/// Which kind of backend a [`Store`] should open.
///
/// Only the ephemeral in-process backend actually ships in this workspace
/// (`jsonstm-storage::ShardedStore`, see `DESIGN.md`); `Persistent` is part
/// of the interface so a future `Storage` implementation backed by a real
/// embedded database can be dropped in without changing this crate's public
/// surface. Until then it behaves identically to `Ephemeral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// In-memory only; nothing survives the process.
    #[default]
    Ephemeral,
    /// Durable storage at `location`. Not implemented by the one backend
    /// this workspace ships; accepted for interface completeness.
    Persistent,
}

/// Options for [`Store::open`].
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Which backend kind to open.
    pub backend: BackendKind,
    /// Filesystem location for a `Persistent` backend. Ignored by the
    /// shipped `Ephemeral`/in-process backend.
    pub location: Option<PathBuf>,
    /// When set, this open call joins a process-wide table shared by every
    /// other `Store::open` call using the same `handle_id`, instead of
    /// creating a private one. Useful for tests that simulate multiple
    /// independent client connections to the same tvar set.
    pub handle_id: Option<u64>,
    /// Retry driver tunables. Defaults match the reference policy (1000
    /// attempts, backoff every 10th retry, capped at 100ms).
    pub retry_policy: RetryPolicy,
    /// Size bounds on tvar ids and documents, checked at `new_tvar` and at
    /// commit time for every write.
    pub limits: Limits,
}

/// A handle onto a table of tvars.
///
/// Cheap to clone and to hand out via [`Store::new_handle`]: the underlying
/// table lives behind an `Arc<dyn Storage>`, so every handle derived from
/// the same `open`/`new_handle` call observes the same committed state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn Storage>,
    retry_policy: RetryPolicy,
    limits: Limits,
}

impl Store {
    /// Open a store per `options`.
    ///
    /// If `options.handle_id` is set and a store with that id has already
    /// been opened in this process, this call returns another handle onto
    /// the same underlying table rather than creating a new one.
    pub fn open(options: StoreOptions) -> Result<Store> {
        let inner = match options.handle_id {
            Some(id) => registry::handle_for(id),
            None => Arc::new(ShardedStore::new()) as Arc<dyn Storage>,
        };
        Ok(Store {
            inner,
            retry_policy: options.retry_policy,
            limits: options.limits,
        })
    }

    /// Another handle onto the same underlying table as `self`.
    pub fn new_handle(&self) -> Store {
        Store {
            inner: Arc::clone(&self.inner),
            retry_policy: self.retry_policy,
            limits: self.limits.clone(),
        }
    }

    /// Create a new tvar at version 0. Fails with [`StmError::AlreadyExists`]
    /// if `id` already has a record, if `id` fails validation (empty, too
    /// long, or containing a NUL byte), or if `initial_value` violates this
    /// store's document [`Limits`] (encoded size, nesting depth, array
    /// length).
    pub fn new_tvar(&self, id: &str, initial_value: impl Into<JsonValue>) -> Result<()> {
        validate_id_with_limits(id, &self.limits).map_err(|e| StmError::BackendError(e.to_string()))?;
        let initial_value = initial_value.into();
        self.limits
            .validate_document(&initial_value)
            .map_err(|e| StmError::BackendError(e.to_string()))?;
        self.inner.insert(id, initial_value)
    }

    /// The current committed `(value, version)` for `id`, or `None` if it
    /// does not exist. Outside the scope of any transaction: this is a
    /// point-in-time read of the store, not part of a read set.
    pub fn snapshot_record(&self, id: &str) -> Result<Option<(JsonValue, u64)>> {
        self.inner.select_value_version(id)
    }

    /// The current committed version for `id`, or `None` if it does not
    /// exist. Cheaper than [`Self::snapshot_record`] when only the version
    /// is needed.
    pub fn current_version(&self, id: &str) -> Result<Option<u64>> {
        self.inner.select_version(id)
    }

    /// Run `f` to completion, retrying on conflict per this store's retry
    /// policy, and return its result once it commits.
    ///
    /// `f` may be invoked more than once: every attempt gets a fresh
    /// [`Tx`], so side effects `f` performs outside of `Tx` (e.g. capturing
    /// external state by reference) must themselves be idempotent or
    /// attempt-local. If `f` returns `Err`, that error propagates
    /// immediately without retrying and without committing.
    pub fn atomically<F, T>(&self, f: F) -> Result<T>
    where
        F: FnMut(&mut Tx) -> Result<T>,
    {
        jsonstm_concurrency::atomically(&self.inner, &self.retry_policy, &self.limits, f)
    }
}
