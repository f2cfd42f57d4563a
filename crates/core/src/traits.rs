//! The versioned KV store backend contract.
//!
//! Anything implementing [`Storage`] can sit underneath the engine: the
//! in-process `DashMap`-backed store in `jsonstm-storage` is the one
//! conforming backend shipped in this workspace, but the trait is the only
//! thing the commit protocol and transaction context depend on.
//!
//! Thread safety: all methods must be safe to call concurrently from
//! multiple threads (`Send + Sync`).

use crate::error::Result;
use crate::json::JsonValue;

/// A versioned key-value store keyed by tvar id.
///
/// Every stored record is a `(value, version)` pair. `version` starts at
/// `0` on [`Storage::insert`] and only ever advances through
/// [`Storage::cas_update`], by exactly `1` per successful call.
pub trait Storage: Send + Sync {
    /// Create a new record at version `0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` already has a record.
    fn insert(&self, id: &str, value: JsonValue) -> Result<()>;

    /// Fetch the current value and version for `id`.
    ///
    /// Returns `None` if no record exists for `id`.
    fn select_value_version(&self, id: &str) -> Result<Option<(JsonValue, u64)>>;

    /// Fetch just the current version for `id`, without the value.
    ///
    /// Returns `None` if no record exists for `id`.
    fn select_version(&self, id: &str) -> Result<Option<u64>>;

    /// Compare-and-swap: replace the stored value with `new_value` and
    /// advance the version by `1`, but only if the current version equals
    /// `expected_version`.
    ///
    /// Returns `true` if the update applied, `false` if `expected_version`
    /// no longer matched (the caller lost the race). Returns an error only
    /// for backend failures, not for a version mismatch.
    fn cas_update(&self, id: &str, new_value: JsonValue, expected_version: u64) -> Result<bool>;

    /// Begin the single exclusive section the commit protocol runs inside:
    /// read-set validation and every `cas_update` of a commit happen while
    /// this section is held, so no other commit can interleave.
    fn begin_exclusive(&self) -> Box<dyn ExclusiveSection + '_>;
}

/// A held exclusive section, returned by [`Storage::begin_exclusive`].
///
/// Dropping the guard without calling `commit` or `rollback` is equivalent
/// to `rollback`: the section releases and no partial state persists.
pub trait ExclusiveSection {
    /// Release the section, keeping whatever writes were made while it was held.
    fn commit(self: Box<Self>) -> Result<()>;

    /// Release the section, discarding the fact that it was ever held.
    /// `jsonstm-storage`'s `cas_update` calls inside the section are
    /// already durable as they land, so `rollback` here only releases the
    /// lock; it does not undo writes (the commit protocol only calls
    /// `cas_update` after validation has already succeeded).
    fn rollback(self: Box<Self>);
}
