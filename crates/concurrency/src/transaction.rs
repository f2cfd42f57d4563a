//! Per-transaction read/write tracking.
//!
//! `TransactionContext` is the `Tx` a user closure sees inside `atomically`.
//! It owns nothing durable: every read it serves comes either from its own
//! read set (a snapshot taken the first time an id was touched) or from its
//! own write set (values the closure itself has staged). The context never
//! mutates the backing store directly — that only happens in the commit
//! protocol, after the closure has returned.

use std::collections::HashMap;
use std::sync::Arc;

use jsonstm_core::error::{Result, StmError};
use jsonstm_core::json::{apply_patches, get_at_path, set_at_path, JsonPath, JsonValue, PatchOp};
use jsonstm_core::traits::Storage;

/// What a transaction observed when it first touched an id.
///
/// `accessed_paths` is informational only: this engine validates whole
/// records at commit, not individual paths, so the list is never consulted
/// by the commit protocol. It exists so callers (and tests) can inspect
/// which paths a transaction actually projected.
#[derive(Debug, Clone)]
pub struct ReadEntry {
    /// The value observed at first read.
    pub value: JsonValue,
    /// The version the value was observed at.
    pub version: u64,
    /// Paths projected out of this id during the transaction, in the order
    /// they were accessed.
    pub accessed_paths: Vec<JsonPath>,
}

/// A transaction's pending write for one id.
#[derive(Debug, Clone)]
pub enum WritePlan {
    /// Replace the whole document. Supersedes any prior plan for the id.
    FullReplace(JsonValue),
    /// An ordered list of path writes to apply on top of the current
    /// committed document at commit time.
    Patch(Vec<PatchOp>),
}

/// Per-attempt transaction state: the read set, the write set, and a handle
/// to the store the transaction will validate and commit against.
///
/// A `TransactionContext` is created fresh for every attempt of a retried
/// transaction and is discarded on commit or abort — it carries no state
/// across attempts.
pub struct TransactionContext {
    store: Arc<dyn Storage>,
    read_set: HashMap<String, ReadEntry>,
    write_set: HashMap<String, WritePlan>,
}

impl TransactionContext {
    /// Start a fresh, empty transaction attempt against `store`.
    pub fn new(store: Arc<dyn Storage>) -> Self {
        TransactionContext {
            store,
            read_set: HashMap::new(),
            write_set: HashMap::new(),
        }
    }

    /// The read set accumulated so far, for the commit protocol to validate.
    pub fn read_set(&self) -> &HashMap<String, ReadEntry> {
        &self.read_set
    }

    /// The write set accumulated so far, for the commit protocol to apply.
    pub fn write_set(&self) -> &HashMap<String, WritePlan> {
        &self.write_set
    }

    /// Read the full document for `id`.
    ///
    /// Read-your-writes: if `id` has a pending `FullReplace`, that value is
    /// returned (and recorded in the read set against the store's current
    /// version, so the write is still validated at commit). If `id` has a
    /// pending `Patch` plan instead, the current committed document (or the
    /// read set's cache, if already present) is fetched and the patches
    /// applied on top before returning, so a read after a path-only write
    /// still observes it. Otherwise the read set's cached value is returned
    /// if present, else a fresh snapshot is taken from the store and cached.
    pub fn read_tvar(&mut self, id: &str) -> Result<JsonValue> {
        if let Some(WritePlan::FullReplace(v)) = self.write_set.get(id) {
            let v = v.clone();
            if !self.read_set.contains_key(id) {
                let version = self.current_version_for_validation(id)?;
                self.read_set.insert(
                    id.to_string(),
                    ReadEntry {
                        value: v.clone(),
                        version,
                        accessed_paths: Vec::new(),
                    },
                );
            }
            return Ok(v);
        }

        if let Some(WritePlan::Patch(ops)) = self.write_set.get(id).cloned() {
            return self.materialize_patched(id, &ops);
        }

        if let Some(entry) = self.read_set.get(id) {
            return Ok(entry.value.clone());
        }

        self.snapshot_into_read_set(id)?;
        Ok(self.read_set.get(id).expect("just inserted").value.clone())
    }

    /// Stage a full replacement for `id`. Overwrites any prior plan for the
    /// same id; does not touch the read set (the value written has not been
    /// read from the store).
    pub fn write_tvar(&mut self, id: &str, value: JsonValue) {
        self.write_set
            .insert(id.to_string(), WritePlan::FullReplace(value));
    }

    /// Project `path` out of `id`.
    ///
    /// Resolves the same way as [`Self::read_tvar`] but projects a single
    /// path out of the resolved document, recording the path in the read
    /// set's `accessed_paths` when the document is read from the cache.
    /// Returns [`StmError::PathAbsent`] if the path traverses through a
    /// missing key or an out-of-range index.
    pub fn read_tvar_path(&mut self, id: &str, path: &str) -> Result<JsonValue> {
        let path: JsonPath = path.parse()?;

        if let Some(WritePlan::FullReplace(v)) = self.write_set.get(id) {
            let projected = get_at_path(v, &path)
                .cloned()
                .ok_or_else(|| StmError::path_absent(id, &path))?;
            return Ok(projected);
        }

        if let Some(WritePlan::Patch(ops)) = self.write_set.get(id).cloned() {
            let doc = self.materialize_patched(id, &ops)?;
            if let Some(entry) = self.read_set.get_mut(id) {
                entry.accessed_paths.push(path.clone());
            }
            return get_at_path(&doc, &path)
                .cloned()
                .ok_or_else(|| StmError::path_absent(id, &path));
        }

        if !self.read_set.contains_key(id) {
            self.snapshot_into_read_set(id)?;
        }

        let entry = self.read_set.get_mut(id).expect("just ensured present");
        entry.accessed_paths.push(path.clone());
        get_at_path(&entry.value, &path)
            .cloned()
            .ok_or_else(|| StmError::path_absent(id, &path))
    }

    /// Stage a single path write for `id`.
    ///
    /// If `id` already has a pending `FullReplace`, the path is applied to
    /// that staged document in place. Otherwise the write is appended to an
    /// ordered `Patch` plan (creating one if this is the first patch for
    /// `id`), to be applied against the committed document at commit time.
    /// Does not require a prior read of `id`.
    pub fn update_tvar_path(&mut self, id: &str, path: &str, value: JsonValue) -> Result<()> {
        let path: JsonPath = path.parse()?;

        match self.write_set.get_mut(id) {
            Some(WritePlan::FullReplace(doc)) => {
                set_at_path(doc, &path, value)?;
            }
            Some(WritePlan::Patch(ops)) => {
                ops.push(PatchOp::new(path, value));
            }
            None => {
                self.write_set.insert(
                    id.to_string(),
                    WritePlan::Patch(vec![PatchOp::new(path, value)]),
                );
            }
        }
        Ok(())
    }

    /// Materialize the document a `read_tvar(id)` would currently see,
    /// accounting for a pending `Patch` plan with no full replace — fetches
    /// the current committed document (or the read-set cache, if already
    /// present) and applies the patches in order, caching the result in the
    /// read set. Used so that reads after patch-only writes still see those
    /// writes in full.
    fn materialize_patched(&mut self, id: &str, ops: &[PatchOp]) -> Result<JsonValue> {
        if !self.read_set.contains_key(id) {
            self.snapshot_into_read_set(id)?;
        }
        let base = self.read_set.get(id).expect("just ensured present").value.clone();
        let mut doc = base;
        apply_patches(&mut doc, ops)?;
        Ok(doc)
    }

    fn snapshot_into_read_set(&mut self, id: &str) -> Result<()> {
        let (value, version) = self
            .store
            .select_value_version(id)?
            .ok_or_else(|| StmError::NotFound(id.to_string()))?;
        self.read_set.insert(
            id.to_string(),
            ReadEntry {
                value,
                version,
                accessed_paths: Vec::new(),
            },
        );
        Ok(())
    }

    /// The version to validate a staged `FullReplace`'s read-set entry
    /// against: the store's current version for `id` (there is no prior
    /// observed value to compare to, since the write itself created `v`).
    fn current_version_for_validation(&self, id: &str) -> Result<u64> {
        self.store
            .select_version(id)?
            .ok_or_else(|| StmError::NotFound(id.to_string()))
    }
}
