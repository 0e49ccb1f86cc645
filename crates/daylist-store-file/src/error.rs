//! Error types for daylist file store operations.

use thiserror::Error;

/// Errors that can occur during `FileStore` operations.
#[derive(Error, Debug)]
pub enum FileStoreError {
    /// Key cannot be mapped to a file name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// I/O operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory being accessed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Temporary file could not replace the target.
    #[error("Failed to replace {path}: {source}")]
    Persist {
        /// Target file.
        path: String,
        /// Underlying error.
        #[source]
        source: tempfile::PersistError,
    },
}
