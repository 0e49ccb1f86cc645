//! Validation errors raised by the task model.

use thiserror::Error;

/// Input rejected before it reaches the task collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Task text was empty after trimming.
    #[error("task text must not be empty")]
    EmptyText,

    /// Due date was not a `YYYY-MM-DD` calendar date.
    #[error("invalid due date '{input}' (expected YYYY-MM-DD)")]
    InvalidDueDate {
        /// Raw input as supplied.
        input: String,
    },

    /// A keyword did not name a known variant.
    #[error("unknown {kind}: {value}")]
    UnknownValue {
        /// What was being parsed.
        kind: &'static str,
        /// Raw input as supplied.
        value: String,
    },
}

impl ValidationError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownValue {
            kind,
            value: value.to_owned(),
        }
    }
}
