//! lecorpus - Document Store Boundary
//!
//! *Le Corpus* (The Corpus) - Read-only access to crawled web documents.
//! This crate owns the document model, the predicate form that compiled
//! queries target, and the [`TextIndex`] trait that every store
//! implementation satisfies. It also ships [`MemoryIndex`], an in-memory
//! reference store backed by a JSON corpus file, used by tests and the
//! command-line tools.
//!
//! The engine never writes through this boundary: crawling and index
//! maintenance happen elsewhere, and everything here observes a snapshot.

#![warn(missing_docs)]

/// Stored document model
pub mod document;
/// Store errors
pub mod error;
/// The store boundary trait
pub mod index;
/// In-memory reference store
pub mod memory;
/// Compiled query predicates
pub mod predicate;

pub use document::{host_of, StoredDocument};
pub use error::StoreError;
pub use index::{IndexHit, TextIndex};
pub use memory::MemoryIndex;
pub use predicate::{Field, Predicate};
