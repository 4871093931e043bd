//! leclassement - Ranking Engine
//!
//! *Le Classement* (The Ranking) - Executes queries against a store,
//! shapes result pages with snippets, serves autocomplete from the term
//! dictionary, and explains BM25 scores factor by factor.

#![warn(missing_docs)]

/// BM25 score explanation
pub mod explainer;
/// Search execution and result shaping
pub mod ranker;

pub use explainer::{
    DocumentStats, Explainer, FieldContributions, Rarity, ScoreBreakdown, ScoreExplanation,
    TermMatch,
};
pub use ranker::{Ranker, SearchHit, SearchResponse};
