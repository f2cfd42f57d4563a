//! Core types shared across the jsonstm engine
//!
//! This crate defines the foundational types every other crate in the
//! workspace builds on:
//! - `json`: the `JsonValue`/`JsonPath` algebra and patch semantics
//! - `tvar`: the `TVarRecord` the store holds
//! - `traits`: the `Storage` backend contract
//! - `key`: tvar id validation
//! - `limits`: size bounds on ids and documents
//! - `error`: the crate-wide `StmError` type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json;
pub mod key;
pub mod limits;
pub mod traits;
pub mod tvar;

pub use error::{user_error, Aborted, Result, StmError};
pub use json::{
    apply_patches, get_at_path, get_at_path_mut, set_at_path, JsonPath, JsonPathError, JsonValue,
    PatchOp, PathParseError, PathSegment,
};
pub use key::{validate_id, validate_id_with_limits, IdError};
pub use limits::Limits;
pub use traits::{ExclusiveSection, Storage};
pub use tvar::TVarRecord;
