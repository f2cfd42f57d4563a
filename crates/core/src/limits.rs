//! Size limits for tvar ids and JSON documents
//!
//! Defensive bounds enforced by the engine at `new_tvar` and at commit time,
//! when a write's resolved document is about to be applied. Violations
//! surface as `StmError::BackendError`, never as a panic.

use crate::json::JsonValue;
use serde_json::Value;
use thiserror::Error;

/// Size limits for tvar ids and JSON documents.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum tvar id length in bytes (default: 1024).
    pub max_id_bytes: usize,

    /// Maximum serialized document size in bytes (default: 16MB).
    pub max_document_bytes: usize,

    /// Maximum JSON nesting depth (default: 128).
    pub max_nesting_depth: usize,

    /// Maximum array length (default: 1M elements).
    pub max_array_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_id_bytes: 1024,
            max_document_bytes: 16 * 1024 * 1024,
            max_nesting_depth: 128,
            max_array_len: 1_000_000,
        }
    }
}

impl Limits {
    /// Limits with small values, useful in tests that exercise limit
    /// enforcement without constructing enormous documents.
    pub fn with_small_limits() -> Self {
        Limits {
            max_id_bytes: 100,
            max_document_bytes: 2000,
            max_nesting_depth: 10,
            max_array_len: 100,
        }
    }

    /// Validate a document against size, depth, and array-length limits.
    ///
    /// Checks the encoded size first (cheapest check), then walks the value
    /// recursively checking nesting depth and array length at every level.
    pub fn validate_document(&self, value: &JsonValue) -> Result<(), LimitError> {
        let encoded = value.size_bytes();
        if encoded > self.max_document_bytes {
            return Err(LimitError::DocumentTooLarge {
                actual: encoded,
                max: self.max_document_bytes,
            });
        }
        self.validate_value_impl(value.as_value(), 0)
    }

    fn validate_value_impl(&self, value: &Value, depth: usize) -> Result<(), LimitError> {
        if depth > self.max_nesting_depth {
            return Err(LimitError::NestingTooDeep {
                actual: depth,
                max: self.max_nesting_depth,
            });
        }

        match value {
            Value::Array(items) => {
                if items.len() > self.max_array_len {
                    return Err(LimitError::ArrayTooLong {
                        actual: items.len(),
                        max: self.max_array_len,
                    });
                }
                for item in items {
                    self.validate_value_impl(item, depth + 1)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                for item in map.values() {
                    self.validate_value_impl(item, depth + 1)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Limit validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitError {
    /// Document exceeds the maximum encoded size.
    #[error("document too large: {actual} bytes exceeds maximum {max}")]
    DocumentTooLarge {
        /// Actual encoded size in bytes.
        actual: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Document nesting exceeds the maximum depth.
    #[error("nesting too deep: {actual} levels exceeds maximum {max}")]
    NestingTooDeep {
        /// Actual nesting depth.
        actual: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// An array within the document exceeds the maximum length.
    #[error("array too long: {actual} elements exceeds maximum {max}")]
    ArrayTooLong {
        /// Actual array length.
        actual: usize,
        /// Maximum allowed length.
        max: usize,
    },
}
