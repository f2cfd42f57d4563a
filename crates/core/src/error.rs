//! Crate-wide error type
//!
//! One variant per error kind in the backend/transaction contract. A commit
//! conflict is never represented here — it's `CommitOutcome::Conflict` in
//! `jsonstm-concurrency`'s validation module, swallowed and retried by the
//! retry driver before it ever reaches a caller. Every variant in this enum
//! is terminal for the attempt that raised it.

use std::fmt;

use crate::json::{JsonPath, JsonPathError, PathParseError};
use crate::limits::LimitError;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StmError>;

/// Errors surfaced to callers of the STM engine.
#[derive(Debug, thiserror::Error)]
pub enum StmError {
    /// `new_tvar` was called with an id that already exists.
    #[error("tvar already exists: {0}")]
    AlreadyExists(String),

    /// A read or write inside a transaction referenced an id with no record.
    #[error("tvar not found: {0}")]
    NotFound(String),

    /// `read_tvar_path` traversed through a missing key or out-of-range index.
    #[error("path {path} absent on tvar {id}")]
    PathAbsent {
        /// The tvar being projected.
        id: String,
        /// The path that could not be resolved.
        path: String,
    },

    /// The retry driver exhausted its attempt budget without committing.
    #[error("max retry attempts exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Attempts actually made before giving up.
        attempts: u32,
    },

    /// The user closure returned an error. Propagated verbatim, never retried.
    #[error("transaction closure failed: {0}")]
    UserError(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// The backend reported a failure unrelated to optimistic concurrency
    /// (I/O failure, malformed record, exclusive-lock poisoning, ...).
    #[error("backend error: {0}")]
    BackendError(String),
}

impl StmError {
    /// Build a [`StmError::PathAbsent`] from a tvar id and path.
    pub fn path_absent(id: impl Into<String>, path: &JsonPath) -> Self {
        StmError::PathAbsent {
            id: id.into(),
            path: path.to_path_string(),
        }
    }
}

impl From<JsonPathError> for StmError {
    fn from(err: JsonPathError) -> Self {
        StmError::BackendError(err.to_string())
    }
}

impl From<PathParseError> for StmError {
    fn from(err: PathParseError) -> Self {
        StmError::BackendError(err.to_string())
    }
}

impl From<LimitError> for StmError {
    fn from(err: LimitError) -> Self {
        StmError::BackendError(err.to_string())
    }
}

/// Wraps an arbitrary user closure error so it can flow through [`StmError::UserError`].
pub fn user_error<E>(err: E) -> StmError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StmError::UserError(Box::new(err))
}

/// A plain string error, for closures that just want to bail with a message.
#[derive(Debug)]
pub struct Aborted(pub String);

impl fmt::Display for Aborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Aborted {}
