//! lemoteur - Search Engine Facade
//!
//! *Le Moteur* (The Engine) - Ties the stack together: the document
//! store boundary from lecorpus, query parsing from lerequete, ranking
//! from leclassement and link-graph analysis from letoile, behind one
//! engine handle and a CLI.
//!
//! The engine is read-only over a crawled corpus. Opening a missing
//! corpus fails fast; after that, no query text can produce an error.

#![warn(missing_docs)]

/// Command-line interface
pub mod cli;

/// Engine configuration
pub mod config;

/// The engine facade
pub mod engine;

/// Engine errors
pub mod error;

pub use config::EngineConfig;
pub use engine::SearchEngine;
pub use error::EngineError;

// The types an embedding caller works with, re-exported so most uses
// need only this crate.
pub use leclassement::{ScoreExplanation, SearchHit, SearchResponse};
pub use lecorpus::{MemoryIndex, StoredDocument, TextIndex};
pub use letoile::{GraphStatistics, GraphSummary, LinkGraph};
