//! Error types for task store operations.

use anyhow::Error;
use daylist_core::ValidationError;
use thiserror::Error;

/// Result alias used by [`TaskStore`](crate::TaskStore).
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Errors surfaced by [`TaskStore`](crate::TaskStore) operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Input was rejected; the collection is unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Every task id up to `u64::MAX` is taken.
    #[error("no task ids left to allocate")]
    IdsExhausted,
    /// Backing store returned an error.
    #[error("store error: {0}")]
    Storage(#[from] Error),
}

impl TaskStoreError {
    /// Whether the error was caused by user input rather than storage.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
