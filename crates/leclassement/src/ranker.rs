//! Search execution and result shaping
//!
//! The ranker routes queries: anything carrying operator tokens goes
//! through the full parser-compiler pipeline and echoes its parsed form
//! back in the response; plain text becomes a bare full-text predicate.
//! Either way the store does the matching and the ranker shapes the page.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lecorpus::{Field, Predicate, StoreError, TextIndex};
use lerequete::{compile, has_operator_tokens, ParsedQuery, QueryParser};

use crate::explainer::{Explainer, ScoreExplanation};

/// Default maximum snippet length in characters.
pub const DEFAULT_SNIPPET_LENGTH: usize = 150;

/// One search result row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document URL
    pub url: String,

    /// Document title
    pub title: String,

    /// Relevance score
    pub score: f64,

    /// Content excerpt: the store's highlight when available, otherwise
    /// the leading content, whitespace-collapsed and truncated
    pub snippet: String,

    /// Score explanation, present when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ScoreExplanation>,
}

/// A page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The raw query as submitted
    pub query: String,

    /// Number of hits on this page
    pub total_hits: usize,

    /// The hits, relevance-ordered
    pub hits: Vec<SearchHit>,

    /// Parsed operator metadata, present when the query used operators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_query: Option<ParsedQuery>,
}

/// Errors from the ranking layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The store failed to execute the query
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Executes queries against a store and shapes result pages.
pub struct Ranker {
    index: Arc<dyn TextIndex>,
    parser: QueryParser,
    explainer: Explainer,
    snippet_length: usize,
}

impl Ranker {
    /// Create a ranker with the default snippet length.
    pub fn new(index: Arc<dyn TextIndex>) -> Self {
        Self::with_snippet_length(index, DEFAULT_SNIPPET_LENGTH)
    }

    /// Create a ranker with an explicit snippet length.
    pub fn with_snippet_length(index: Arc<dyn TextIndex>, snippet_length: usize) -> Self {
        Self {
            parser: QueryParser::default(),
            explainer: Explainer::new(Arc::clone(&index)),
            index,
            snippet_length,
        }
    }

    /// Run a search and shape one result page.
    ///
    /// Malformed query text is never an error; the worst a query can do
    /// is degrade to match-all. With `explain` set, every hit carries a
    /// score explanation whose position is its 1-based rank on this page.
    pub fn search(
        &self,
        raw: &str,
        limit: usize,
        offset: usize,
        explain: bool,
    ) -> Result<SearchResponse, Error> {
        let parsed = self.parser.parse(raw);
        let advanced = has_operator_tokens(raw);
        let predicate = if advanced {
            compile(&parsed)
        } else if parsed.base_terms.is_empty() {
            Predicate::All
        } else {
            Predicate::FullText(parsed.base_terms.clone())
        };
        debug!(query = raw, advanced, "executing search");

        let index_hits = self.index.execute(&predicate, limit, offset)?;
        let explanation_terms = if explain {
            explanation_terms(&parsed)
        } else {
            Vec::new()
        };

        let mut hits = Vec::with_capacity(index_hits.len());
        for (i, hit) in index_hits.into_iter().enumerate() {
            let snippet = match &hit.highlight {
                Some(excerpt) => excerpt.clone(),
                None => make_snippet(&hit.doc.content, self.snippet_length),
            };
            let explanation = explain.then(|| {
                self.explainer
                    .explain(&hit.doc, hit.score, &explanation_terms, i + 1)
            });
            hits.push(SearchHit {
                url: hit.doc.url,
                title: hit.doc.title,
                score: hit.score,
                snippet,
                explanation,
            });
        }

        Ok(SearchResponse {
            query: raw.to_string(),
            total_hits: hits.len(),
            hits,
            parsed_query: advanced.then_some(parsed),
        })
    }

    /// Complete a term prefix from the content term dictionary.
    ///
    /// The dictionary is sorted, so suggestions come back in
    /// lexicographic order. An empty prefix suggests nothing.
    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let needle = prefix.to_lowercase();
        let mut suggestions = Vec::new();
        for term in self.index.terms(Field::Content) {
            if term.starts_with(&needle) {
                suggestions.push(term);
                if suggestions.len() >= limit {
                    break;
                }
            }
        }
        suggestions
    }

    /// Number of documents in the store.
    pub fn doc_count(&self) -> usize {
        self.index.doc_count()
    }
}

/// Terms worth profiling in an explanation: free text, phrase words and
/// title-operator words, first occurrence of each.
fn explanation_terms(parsed: &ParsedQuery) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in &parsed.base_terms {
        push_term(&mut terms, term);
    }
    for phrase in &parsed.exact_phrases {
        for word in phrase.split_whitespace() {
            push_term(&mut terms, word);
        }
    }
    if let Some(title) = &parsed.intitle {
        for word in title.split_whitespace() {
            push_term(&mut terms, word);
        }
    }
    terms
}

fn push_term(terms: &mut Vec<String>, term: &str) {
    if !terms.iter().any(|t| t == term) {
        terms.push(term.to_string());
    }
}

/// Collapse whitespace and truncate to `max_length` characters, with an
/// ellipsis marking the cut.
fn make_snippet(content: &str, max_length: usize) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_length {
        collapsed
    } else {
        let truncated: String = collapsed.chars().take(max_length).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lecorpus::{MemoryIndex, StoredDocument};

    fn doc(url: &str, title: &str, content: &str, day: u32) -> StoredDocument {
        StoredDocument {
            url: url.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            links: Vec::new(),
            crawled_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
        }
    }

    fn ranker() -> Ranker {
        let long_essay = "systems thinking essay text ".repeat(8);
        let index = MemoryIndex::from_documents(vec![
            doc(
                "https://docs.example.com/rust-book",
                "The Rust Book",
                "rust ownership and borrowing explained for systems work",
                10,
            ),
            doc(
                "https://example.com/python",
                "Python Guide",
                "python   scripting\nfor data\twork and automation",
                12,
            ),
            doc("https://blog.example.org/essay.pdf", "Systems Essay", &long_essay, 20),
        ]);
        Ranker::new(Arc::new(index))
    }

    #[test]
    fn test_plain_query_has_no_parsed_metadata() {
        let response = ranker().search("systems work", 10, 0, false).unwrap();
        assert!(response.parsed_query.is_none());
        assert_eq!(response.query, "systems work");
        assert_eq!(response.total_hits, 1);
        assert_eq!(response.hits[0].url, "https://docs.example.com/rust-book");
    }

    #[test]
    fn test_operator_query_echoes_its_parsed_form() {
        let response = ranker().search("site:example.com", 10, 0, false).unwrap();
        let parsed = response.parsed_query.expect("operator query keeps metadata");
        assert_eq!(parsed.site.as_deref(), Some("example.com"));
        assert_eq!(response.total_hits, 2);
    }

    #[test]
    fn test_empty_query_degrades_to_match_all() {
        let response = ranker().search("", 10, 0, false).unwrap();
        assert_eq!(response.total_hits, 3);
        assert!(response.parsed_query.is_none());
        assert!(response.hits.iter().all(|h| h.score == 1.0));
    }

    #[test]
    fn test_keyword_only_query_matches_all() {
        let response = ranker().search("AND OR", 10, 0, false).unwrap();
        assert_eq!(response.total_hits, 3);
    }

    #[test]
    fn test_exclusion_filters_matching_documents() {
        // Both "systems" documents exist; only the essay lacks "rust".
        let response = ranker().search("systems -rust", 10, 0, false).unwrap();
        assert_eq!(response.total_hits, 1);
        assert_eq!(response.hits[0].url, "https://blog.example.org/essay.pdf");
        assert!(response.parsed_query.is_some());
    }

    #[test]
    fn test_phrase_query_routes_through_the_advanced_path() {
        let response = ranker().search(r#""systems thinking""#, 10, 0, false).unwrap();
        assert_eq!(response.total_hits, 1);
        assert_eq!(response.hits[0].url, "https://blog.example.org/essay.pdf");
        let parsed = response.parsed_query.unwrap();
        assert_eq!(parsed.exact_phrases, vec!["systems thinking"]);
    }

    #[test]
    fn test_text_match_snippets_use_the_store_highlight() {
        let response = ranker().search("automation", 10, 0, false).unwrap();
        assert_eq!(response.total_hits, 1);
        assert!(response.hits[0].snippet.contains("automation"));
    }

    #[test]
    fn test_filter_match_snippets_fall_back_to_truncated_content() {
        let response = ranker().search("filetype:pdf", 10, 0, false).unwrap();
        let snippet = &response.hits[0].snippet;
        assert!(snippet.ends_with("..."));
        // 150 characters of content plus the three-dot marker.
        assert_eq!(snippet.chars().count(), 153);
    }

    #[test]
    fn test_fallback_snippets_collapse_whitespace() {
        let response = ranker().search("inurl:python", 10, 0, false).unwrap();
        assert_eq!(
            response.hits[0].snippet,
            "python scripting for data work and automation"
        );
    }

    #[test]
    fn test_short_content_is_not_given_an_ellipsis() {
        assert_eq!(make_snippet("a few words", 150), "a few words");
        assert_eq!(make_snippet("exactly", 7), "exactly");
        assert_eq!(make_snippet("overflow", 4), "over...");
    }

    #[test]
    fn test_pagination_is_delegated_to_the_store() {
        let all = ranker().search("", 10, 0, false).unwrap();
        let first = ranker().search("", 2, 0, false).unwrap();
        let second = ranker().search("", 2, 2, false).unwrap();
        assert_eq!(all.total_hits, 3);
        assert_eq!(first.total_hits, 2);
        assert_eq!(second.total_hits, 1);
        assert_ne!(first.hits[0].url, second.hits[0].url);
    }

    #[test]
    fn test_explanations_carry_page_local_positions() {
        let response = ranker().search("work", 10, 0, true).unwrap();
        assert_eq!(response.total_hits, 2);
        let positions: Vec<usize> = response
            .hits
            .iter()
            .map(|h| h.explanation.as_ref().unwrap().position)
            .collect();
        assert_eq!(positions, vec![1, 2]);

        // On a later page the count restarts: position is page-local.
        let paged = ranker().search("work", 1, 1, true).unwrap();
        assert_eq!(paged.hits[0].explanation.as_ref().unwrap().position, 1);
    }

    #[test]
    fn test_explanations_are_absent_unless_requested() {
        let response = ranker().search("work", 10, 0, false).unwrap();
        assert!(response.hits.iter().all(|h| h.explanation.is_none()));
    }

    #[test]
    fn test_autocomplete_completes_prefixes_in_dictionary_order() {
        let r = ranker();
        assert_eq!(r.autocomplete("auto", 5), vec!["automation"]);
        assert_eq!(r.autocomplete("s", 5), vec!["scripting", "systems"]);
        // Prefixes are matched case-insensitively.
        assert_eq!(r.autocomplete("PY", 5), vec!["python"]);
    }

    #[test]
    fn test_autocomplete_respects_the_limit_and_empty_prefix() {
        let r = ranker();
        assert_eq!(r.autocomplete("s", 1), vec!["scripting"]);
        assert!(r.autocomplete("", 5).is_empty());
        assert!(r.autocomplete("zzz", 5).is_empty());
    }

    #[test]
    fn test_doc_count_is_passed_through() {
        assert_eq!(ranker().doc_count(), 3);
    }
}
