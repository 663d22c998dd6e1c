//! Error types for row decoding.

use thiserror::Error;

/// Result type alias for decode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for row decoding operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The destination struct registers no columns at all.
    #[error("No fields annotated for decoding in `{type_name}`")]
    NoAnnotatedFields { type_name: &'static str },

    /// A column value cannot be assigned to its mapped field.
    #[error("Type mismatch for column `{column}`: expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The source reported rows but yielded none on the first pull.
    #[error("Empty rows: source reported rows but yielded none")]
    EmptyRows,

    /// The source yielded fewer rows than it reported.
    #[error("Short read: source reported {expected} rows, yielded {read}")]
    ShortRead { expected: usize, read: usize },
}

impl Error {
    /// Create a type mismatch error for a column.
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            actual,
        }
    }

    /// Create a no-annotated-fields error for the type `T`.
    pub fn no_annotated_fields<T: ?Sized>() -> Self {
        Self::NoAnnotatedFields {
            type_name: std::any::type_name::<T>(),
        }
    }
}
