//! TVar id validation
//!
//! Ids are Unicode strings with a small set of constraints enforced at
//! `new_tvar` time. These are a defensive boundary check, not a schema on
//! the TVar's JSON value (spec.md disclaims schema enforcement on values).
//!
//! ## Contract
//!
//! - Ids must be valid UTF-8 (guaranteed by Rust's `&str`)
//! - Ids must not be empty
//! - Ids must not contain NUL bytes (`\0`)
//! - Ids must not exceed `max_id_bytes` (default: 1024)

use crate::limits::Limits;
use thiserror::Error;

/// Validate a tvar id using default limits.
///
/// ```
/// use jsonstm_core::key::validate_id;
///
/// assert!(validate_id("counter").is_ok());
/// assert!(validate_id("user:123").is_ok());
///
/// assert!(validate_id("").is_err());
/// assert!(validate_id("a\x00b").is_err());
/// ```
pub fn validate_id(id: &str) -> Result<(), IdError> {
    validate_id_with_limits(id, &Limits::default())
}

/// Validate a tvar id against custom limits.
pub fn validate_id_with_limits(id: &str, limits: &Limits) -> Result<(), IdError> {
    if id.is_empty() {
        return Err(IdError::Empty);
    }

    if id.contains('\x00') {
        return Err(IdError::ContainsNul);
    }

    let len = id.len();
    if len > limits.max_id_bytes {
        return Err(IdError::TooLong {
            actual: len,
            max: limits.max_id_bytes,
        });
    }

    Ok(())
}

/// TVar id validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// Id is empty (length 0).
    #[error("tvar id cannot be empty")]
    Empty,

    /// Id contains a NUL byte (`\0`).
    #[error("tvar id cannot contain NUL bytes")]
    ContainsNul,

    /// Id exceeds the maximum configured length.
    #[error("tvar id too long: {actual} bytes exceeds maximum {max}")]
    TooLong {
        /// Actual id length in bytes.
        actual: usize,
        /// Maximum allowed length.
        max: usize,
    },
}
