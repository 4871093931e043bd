//! Compilation of parsed queries into store predicates
//!
//! Pure and total: every [`ParsedQuery`] compiles to something, down to
//! [`Predicate::All`] when nothing usable was typed.

use chrono::NaiveDate;

use lecorpus::Predicate;

use crate::parser::ParsedQuery;

/// Date format accepted by the `daterange:` operator.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Compile a parsed query into a predicate.
///
/// Clauses are emitted in a fixed order: free text, site, file type,
/// title, URL fragment, date range, phrases, exclusions. A date range
/// whose bounds fail to parse as real calendar dates is dropped; the rest
/// of the query still runs.
pub fn compile(parsed: &ParsedQuery) -> Predicate {
    let mut clauses = Vec::new();

    if !parsed.base_terms.is_empty() {
        clauses.push(Predicate::FullText(parsed.base_terms.clone()));
    }
    if let Some(site) = &parsed.site {
        clauses.push(Predicate::Domain(site.clone()));
    }
    if let Some(ext) = &parsed.filetype {
        clauses.push(Predicate::FileType(ext.clone()));
    }
    if let Some(title) = &parsed.intitle {
        clauses.push(Predicate::InTitle(split_terms(title)));
    }
    if let Some(fragment) = &parsed.inurl {
        clauses.push(Predicate::UrlContains(fragment.clone()));
    }
    if let Some(range) = &parsed.daterange {
        let bounds = (
            NaiveDate::parse_from_str(&range.start, DATE_FORMAT),
            NaiveDate::parse_from_str(&range.end, DATE_FORMAT),
        );
        if let (Ok(start), Ok(end)) = bounds {
            clauses.push(Predicate::DateRange { start, end });
        }
    }
    for phrase in &parsed.exact_phrases {
        clauses.push(Predicate::Phrase(split_terms(phrase)));
    }
    for term in &parsed.excluded_terms {
        clauses.push(Predicate::Not(term.to_lowercase()));
    }

    Predicate::conjunction(clauses)
}

fn split_terms(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
