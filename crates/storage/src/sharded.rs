//! The in-process `Storage` backend.
//!
//! `ShardedStore` keeps one `(value, version)` pair per tvar id in a
//! `DashMap`, giving lock-free reads and per-entry-sharded writes. The
//! commit protocol's single exclusive section is a `parking_lot::Mutex`
//! guard returned from [`Storage::begin_exclusive`]; nothing else in this
//! store needs a lock, since `cas_update` is a single atomic map operation.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};

use jsonstm_core::error::{Result, StmError};
use jsonstm_core::json::JsonValue;
use jsonstm_core::traits::{ExclusiveSection, Storage};

/// An in-process, `DashMap`-backed [`Storage`] implementation.
///
/// Cheap to clone: the underlying map and commit lock are held behind an
/// `Arc`, so cloning a `ShardedStore` hands out another handle to the same
/// table (this is what [`ShardedStore::new_handle`] relies on).
#[derive(Clone)]
pub struct ShardedStore {
    inner: Arc<Inner>,
}

struct Inner {
    records: DashMap<String, (JsonValue, u64)>,
    commit_lock: Mutex<()>,
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardedStore {
    /// An empty store.
    pub fn new() -> Self {
        ShardedStore {
            inner: Arc::new(Inner {
                records: DashMap::new(),
                commit_lock: Mutex::new(()),
            }),
        }
    }

    /// Another handle onto the same underlying table.
    pub fn new_handle(&self) -> Self {
        ShardedStore {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of tvars currently stored.
    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    /// True if no tvars are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }
}

impl Storage for ShardedStore {
    fn insert(&self, id: &str, value: JsonValue) -> Result<()> {
        match self.inner.records.entry(id.to_string()) {
            Entry::Occupied(_) => Err(StmError::AlreadyExists(id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert((value, 0));
                tracing::trace!(id, "tvar inserted");
                Ok(())
            }
        }
    }

    fn select_value_version(&self, id: &str) -> Result<Option<(JsonValue, u64)>> {
        Ok(self.inner.records.get(id).map(|entry| entry.value().clone()))
    }

    fn select_version(&self, id: &str) -> Result<Option<u64>> {
        Ok(self.inner.records.get(id).map(|entry| entry.value().1))
    }

    fn cas_update(&self, id: &str, new_value: JsonValue, expected_version: u64) -> Result<bool> {
        let Some(mut entry) = self.inner.records.get_mut(id) else {
            tracing::trace!(id, "cas_update on unknown id");
            return Ok(false);
        };
        if entry.1 != expected_version {
            tracing::trace!(id, expected_version, actual = entry.1, "cas_update lost the race");
            return Ok(false);
        }
        *entry = (new_value, expected_version + 1);
        Ok(true)
    }

    fn begin_exclusive(&self) -> Box<dyn ExclusiveSection + '_> {
        let guard = self.inner.commit_lock.lock();
        Box::new(ShardedExclusiveSection { _guard: guard })
    }
}

struct ShardedExclusiveSection<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl<'a> ExclusiveSection for ShardedExclusiveSection<'a> {
    fn commit(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    fn rollback(self: Box<Self>) {}
}
