//! Engine error type

use thiserror::Error;

use lecorpus::StoreError;

/// Errors surfaced by the engine facade.
///
/// Query text is never an error: malformed queries degrade inside the
/// parser. What can fail is the store underneath and the configuration
/// the engine was started with.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The document store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Search execution failed
    #[error(transparent)]
    Ranking(#[from] leclassement::ranker::Error),

    /// Configuration was unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}
