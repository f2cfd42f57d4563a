//! The TVar record: the unit of storage the engine reads and writes.
//!
//! A record is a `(value, version)` pair keyed by a plain string id.
//! Versions start at `0` on creation and increment by exactly `1` on every
//! committing write; a TVar is never deleted once created.

use crate::json::JsonValue;

/// A single TVar's stored state.
#[derive(Debug, Clone, PartialEq)]
pub struct TVarRecord {
    /// The TVar's id.
    pub id: String,
    /// Current JSON value.
    pub value: JsonValue,
    /// Current version. Starts at `0`, incremented by `1` per commit.
    pub version: u64,
}

impl TVarRecord {
    /// Build the initial record for a freshly created TVar (`version: 0`).
    pub fn new(id: impl Into<String>, value: JsonValue) -> Self {
        TVarRecord {
            id: id.into(),
            value,
            version: 0,
        }
    }

    /// Build a record with an explicit version, e.g. when loading from a backend.
    pub fn with_version(id: impl Into<String>, value: JsonValue, version: u64) -> Self {
        TVarRecord {
            id: id.into(),
            value,
            version,
        }
    }
}
