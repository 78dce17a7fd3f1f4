//! Errors raised by the state handle.

use crate::schema::FieldType;
use thiserror::Error;

/// Errors that can occur while reading or writing resource state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// Field is not declared in the schema
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Value type does not match the declared field type
    #[error("field {field} expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: FieldType,
    },

    /// Required field has no desired value
    #[error("required field {0} is not set")]
    MissingRequired(String),

    /// Computed fields are owned by the remote side and cannot be declared
    #[error("field {0} is computed and cannot be set in configuration")]
    Computed(String),

    /// Field has been frozen and rejects writes
    #[error("field {0} is frozen")]
    Frozen(String),
}
