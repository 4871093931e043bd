//! Compiled query predicates
//!
//! *Le Prédicat* (The Predicate) - The form a query takes after
//! compilation: a small tree of relevance clauses and filters that any
//! [`crate::TextIndex`] implementation can execute.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A searchable document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Page title
    Title,
    /// Extracted text content
    Content,
}

/// A compiled query.
///
/// Relevance clauses (`FullText`, `InTitle`, `Phrase`) drive scoring;
/// everything else is a pure filter. A query made only of filters matches
/// with a constant score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Match every document
    All,

    /// Terms matched over title and content; all terms must appear in at
    /// least one of the two fields
    FullText(Vec<String>),

    /// Terms that must all appear in the title
    InTitle(Vec<String>),

    /// URL contains the site string
    Domain(String),

    /// URL ends with `.{extension}`
    FileType(String),

    /// URL contains the fragment
    UrlContains(String),

    /// Crawl date within the inclusive range
    DateRange {
        /// First day included
        start: NaiveDate,
        /// Last day included
        end: NaiveDate,
    },

    /// Terms appearing consecutively in the content
    Phrase(Vec<String>),

    /// Content must not contain the term
    Not(String),

    /// Every sub-predicate must match
    And(Vec<Predicate>),
}

impl Predicate {
    /// Combine clauses into one predicate.
    ///
    /// No clauses degrade to [`Predicate::All`], a single clause stands
    /// alone, several become a conjunction.
    pub fn conjunction(mut clauses: Vec<Predicate>) -> Predicate {
        match clauses.len() {
            0 => Predicate::All,
            1 => clauses.remove(0),
            _ => Predicate::And(clauses),
        }
    }

    /// Whether this predicate contributes to relevance scoring rather
    /// than just filtering.
    pub fn is_relevance(&self) -> bool {
        match self {
            Predicate::FullText(_) | Predicate::InTitle(_) | Predicate::Phrase(_) => true,
            Predicate::And(clauses) => clauses.iter().any(Predicate::is_relevance),
            _ => false,
        }
    }
}
