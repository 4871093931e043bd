//! lerequete - Query Parsing
//!
//! *La Requête* (The Query) - Turns raw query strings with Google-style
//! operators (`site:`, `filetype:`, `intitle:`, `inurl:`, `daterange:`,
//! quoted phrases, `-exclusions`) into structured queries, and compiles
//! those into store predicates.
//!
//! Parsing never fails: whatever the user typed, something searchable
//! comes out the other end.

#![warn(missing_docs)]

/// Compilation of parsed queries into predicates
pub mod compiler;
/// The tokenizing query parser
pub mod parser;

pub use compiler::compile;
pub use parser::{has_operator_tokens, BoolOp, DateRangeSpec, Error, ParsedQuery, QueryParser};
