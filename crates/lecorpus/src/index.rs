//! The store boundary
//!
//! The engine owns no index persistence. Corpus statistics for scoring,
//! term dictionaries for autocomplete, full scans for graph building and
//! predicate execution for search all go through [`TextIndex`].

use serde::{Deserialize, Serialize};

use crate::document::StoredDocument;
use crate::error::StoreError;
use crate::predicate::{Field, Predicate};

/// One document matched by a predicate execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexHit {
    /// The matched document
    pub doc: StoredDocument,

    /// Relevance score; filter-only matches carry a constant 1.0
    pub score: f64,

    /// Store-produced excerpt around the matching content, when the
    /// store supports highlighting
    pub highlight: Option<String>,
}

/// Read-only, synchronous access to a text index.
///
/// Implementations behave as snapshots: two reads between which the
/// caller does nothing observe the same corpus. All methods are cheap to
/// call repeatedly except [`TextIndex::documents`], which walks the whole
/// store.
pub trait TextIndex: Send + Sync {
    /// Total number of documents.
    fn doc_count(&self) -> usize;

    /// Number of documents whose `field` contains `term`.
    fn doc_frequency(&self, field: Field, term: &str) -> usize;

    /// Distinct terms of `field` in lexicographic order.
    fn terms(&self, field: Field) -> Vec<String>;

    /// Scan every document. Item-level errors let callers skip documents
    /// that cannot be read without aborting the scan.
    fn documents(&self) -> Box<dyn Iterator<Item = Result<StoredDocument, StoreError>> + '_>;

    /// Fetch a single document by URL.
    fn get(&self, url: &str) -> Result<Option<StoredDocument>, StoreError>;

    /// Execute a compiled predicate.
    ///
    /// Results come back relevance-ordered with ties broken by URL, then
    /// paginated by `offset` and `limit`.
    fn execute(
        &self,
        predicate: &Predicate,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<IndexHit>, StoreError>;
}
