//! Store errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The index location does not exist. Opening a store over a missing
    /// index is fatal; there is nothing sensible to serve.
    #[error("Index not found at {}", path.display())]
    NotFound {
        /// Location that was opened
        path: PathBuf,
    },

    /// Underlying I/O failure
    #[error("Index I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The corpus data could not be decoded
    #[error("Corrupt corpus: {reason}")]
    Corrupt {
        /// What failed to decode
        reason: String,
    },

    /// A predicate could not be executed
    #[error("Query execution failed: {reason}")]
    Query {
        /// What went wrong
        reason: String,
    },
}
