//! Tokenizing query parser
//!
//! A single scan over the raw query: one alternation tried in priority
//! order at each position, leftmost match wins, every character belongs
//! to exactly one token. Operators embedded inside other tokens are never
//! extracted twice — a hyphen inside a quoted phrase stays part of the
//! phrase instead of spawning a bogus exclusion.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token alternation, tried in priority order at each scan position.
const TOKEN_PATTERN: &str = concat!(
    r"(?i)",
    r"site:(?P<site>\S+)",
    r"|filetype:(?P<filetype>\w+)",
    r#"|intitle:"(?P<intitle_quoted>[^"]+)""#,
    r"|intitle:(?P<intitle>\S+)",
    r"|inurl:(?P<inurl>\S+)",
    r"|daterange:(?P<date_start>\d{4}-\d{2}-\d{2})\.\.(?P<date_end>\d{4}-\d{2}-\d{2})",
    r#"|"(?P<phrase>[^"]+)""#,
    r"|-(?P<exclude>\w+)",
    r"|(?P<word>\S+)",
);

/// Words that never become search terms.
const STOP_KEYWORDS: [&str; 4] = ["and", "or", "not", "to"];

/// Operator prefixes that route a query onto the advanced path.
const OPERATOR_MARKERS: [&str; 5] = ["site:", "filetype:", "intitle:", "inurl:", "daterange:"];

/// Parser construction errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The token pattern failed to compile
    #[error("Invalid query token pattern: {0}")]
    InvalidPattern(String),
}

/// Boolean keyword seen between query terms.
///
/// Recorded for transparency only; matching stays conjunctive regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOp {
    /// The word AND
    And,
    /// The word OR
    Or,
    /// The word NOT
    Not,
}

impl BoolOp {
    fn from_keyword(word: &str) -> Option<BoolOp> {
        if word.eq_ignore_ascii_case("and") {
            Some(BoolOp::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(BoolOp::Or)
        } else if word.eq_ignore_ascii_case("not") {
            Some(BoolOp::Not)
        } else {
            None
        }
    }
}

/// Raw `daterange:` bounds exactly as written in the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeSpec {
    /// Start bound (`YYYY-MM-DD`)
    pub start: String,
    /// End bound (`YYYY-MM-DD`)
    pub end: String,
}

/// Structured form of a raw query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// The raw query as typed
    pub original: String,

    /// `site:` value, first occurrence
    pub site: Option<String>,

    /// `filetype:` value, first occurrence
    pub filetype: Option<String>,

    /// `intitle:` value, first occurrence; the quoted form may hold
    /// several words
    pub intitle: Option<String>,

    /// `inurl:` value, first occurrence
    pub inurl: Option<String>,

    /// `daterange:` bounds, first occurrence, as written
    pub daterange: Option<DateRangeSpec>,

    /// Quoted phrases in query order, duplicates dropped
    pub exact_phrases: Vec<String>,

    /// `-term` exclusions in query order, duplicates dropped
    pub excluded_terms: Vec<String>,

    /// Boolean keywords seen, deduplicated
    pub operators: Vec<BoolOp>,

    /// Remaining free-text terms, in order, original case
    pub base_terms: Vec<String>,
}

/// The query scanner.
///
/// Construction compiles the token pattern once; parsing itself is total
/// and never fails.
pub struct QueryParser {
    token_pattern: Regex,
}

impl QueryParser {
    /// Create a parser.
    pub fn new() -> Result<Self, Error> {
        let token_pattern =
            Regex::new(TOKEN_PATTERN).map_err(|e| Error::InvalidPattern(e.to_string()))?;
        Ok(Self { token_pattern })
    }

    /// Parse a raw query string.
    ///
    /// Scoped operators keep their first occurrence; phrases and
    /// exclusions keep every distinct occurrence in order; `and`, `or`,
    /// `not` and `to` never become base terms.
    pub fn parse(&self, raw: &str) -> ParsedQuery {
        let mut parsed = ParsedQuery {
            original: raw.to_string(),
            ..ParsedQuery::default()
        };

        for caps in self.token_pattern.captures_iter(raw) {
            if let Some(m) = caps.name("site") {
                if parsed.site.is_none() {
                    parsed.site = Some(m.as_str().to_string());
                }
            } else if let Some(m) = caps.name("filetype") {
                if parsed.filetype.is_none() {
                    parsed.filetype = Some(m.as_str().to_string());
                }
            } else if let Some(m) = caps.name("intitle_quoted").or_else(|| caps.name("intitle")) {
                if parsed.intitle.is_none() {
                    parsed.intitle = Some(m.as_str().to_string());
                }
            } else if let Some(m) = caps.name("inurl") {
                if parsed.inurl.is_none() {
                    parsed.inurl = Some(m.as_str().to_string());
                }
            } else if let (Some(start), Some(end)) = (caps.name("date_start"), caps.name("date_end"))
            {
                if parsed.daterange.is_none() {
                    parsed.daterange = Some(DateRangeSpec {
                        start: start.as_str().to_string(),
                        end: end.as_str().to_string(),
                    });
                }
            } else if let Some(m) = caps.name("phrase") {
                push_unique(&mut parsed.exact_phrases, m.as_str());
            } else if let Some(m) = caps.name("exclude") {
                push_unique(&mut parsed.excluded_terms, m.as_str());
            } else if let Some(m) = caps.name("word") {
                let word = m.as_str();
                if let Some(op) = BoolOp::from_keyword(word) {
                    if !parsed.operators.contains(&op) {
                        parsed.operators.push(op);
                    }
                } else if !is_stop_keyword(word) {
                    parsed.base_terms.push(word.to_string());
                }
            }
        }

        parsed
    }
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new().expect("Failed to compile query token pattern")
    }
}

/// Whether raw query text contains any recognizable operator token:
/// a scoped operator prefix, a double quote, or a hyphen.
///
/// Routes between the advanced path (compiled operators plus parsed-query
/// metadata in the response) and plain full-text search.
pub fn has_operator_tokens(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    OPERATOR_MARKERS.iter().any(|marker| lowered.contains(marker))
        || raw.contains('"')
        || raw.contains('-')
}

fn is_stop_keyword(word: &str) -> bool {
    STOP_KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k))
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(raw: &str) -> ParsedQuery {
        QueryParser::default().parse(raw)
    }

    #[test]
    fn test_plain_words_become_base_terms() {
        let parsed = parse("machine learning basics");
        assert_eq!(parsed.base_terms, vec!["machine", "learning", "basics"]);
        assert!(parsed.site.is_none());
        assert!(parsed.exact_phrases.is_empty());
        assert!(parsed.operators.is_empty());
    }

    #[test]
    fn test_original_text_is_preserved_verbatim() {
        let raw = "  rust   site:example.com ";
        assert_eq!(parse(raw).original, raw);
    }

    #[test]
    fn test_stop_keywords_never_reach_base_terms() {
        let parsed = parse("python AND tutorials not Spam TO go");
        assert_eq!(parsed.base_terms, vec!["python", "tutorials", "Spam", "go"]);
        assert_eq!(parsed.operators, vec![BoolOp::And, BoolOp::Not]);
    }

    #[test]
    fn test_operators_are_deduplicated_in_order() {
        let parsed = parse("cats OR dogs or birds AND fish");
        assert_eq!(parsed.operators, vec![BoolOp::Or, BoolOp::And]);
        assert_eq!(parsed.base_terms, vec!["cats", "dogs", "birds", "fish"]);
    }

    #[rstest]
    #[case("site:example.com rust", "example.com")]
    #[case("rust site:example.com", "example.com")]
    #[case("SITE:Example.COM rust", "Example.COM")]
    fn site_operator_is_extracted(#[case] raw: &str, #[case] expected: &str) {
        let parsed = parse(raw);
        assert_eq!(parsed.site.as_deref(), Some(expected));
        assert_eq!(parsed.base_terms, vec!["rust"]);
    }

    #[test]
    fn test_duplicate_scoped_operators_keep_the_first() {
        let parsed = parse("site:first.com site:second.com filetype:pdf filetype:doc");
        assert_eq!(parsed.site.as_deref(), Some("first.com"));
        assert_eq!(parsed.filetype.as_deref(), Some("pdf"));
        assert!(parsed.base_terms.is_empty());
    }

    #[test]
    fn test_filetype_takes_word_characters_only() {
        let parsed = parse("filetype:c++ templates");
        assert_eq!(parsed.filetype.as_deref(), Some("c"));
        assert_eq!(parsed.base_terms, vec!["++", "templates"]);
    }

    #[test]
    fn test_quoted_intitle_spans_several_words() {
        let parsed = parse(r#"intitle:"Breaking News" sports"#);
        assert_eq!(parsed.intitle.as_deref(), Some("Breaking News"));
        assert_eq!(parsed.base_terms, vec!["sports"]);
        assert!(parsed.exact_phrases.is_empty());
    }

    #[test]
    fn test_bare_intitle_takes_a_single_token() {
        let parsed = parse("intitle:rust guide");
        assert_eq!(parsed.intitle.as_deref(), Some("rust"));
        assert_eq!(parsed.base_terms, vec!["guide"]);
    }

    #[test]
    fn test_inurl_operator_is_extracted() {
        let parsed = parse("inurl:blog post");
        assert_eq!(parsed.inurl.as_deref(), Some("blog"));
        assert_eq!(parsed.base_terms, vec!["post"]);
    }

    #[test]
    fn test_well_formed_daterange_is_captured() {
        let parsed = parse("rust daterange:2024-01-01..2024-06-30");
        let range = parsed.daterange.unwrap();
        assert_eq!(range.start, "2024-01-01");
        assert_eq!(range.end, "2024-06-30");
        assert_eq!(parsed.base_terms, vec!["rust"]);
    }

    #[test]
    fn test_malformed_daterange_shape_stays_a_plain_word() {
        let parsed = parse("daterange:2024-1-1..2024-06-30 rust");
        assert!(parsed.daterange.is_none());
        assert_eq!(
            parsed.base_terms,
            vec!["daterange:2024-1-1..2024-06-30", "rust"]
        );
    }

    #[test]
    fn test_phrases_are_kept_in_order_without_duplicates() {
        let parsed = parse(r#""alpha beta" "gamma" "alpha beta""#);
        assert_eq!(parsed.exact_phrases, vec!["alpha beta", "gamma"]);
        assert!(parsed.base_terms.is_empty());
    }

    #[test]
    fn test_hyphen_inside_a_phrase_is_not_an_exclusion() {
        let parsed = parse(r#""state-of-the-art design" -spam"#);
        assert_eq!(parsed.exact_phrases, vec!["state-of-the-art design"]);
        assert_eq!(parsed.excluded_terms, vec!["spam"]);
        assert!(parsed.base_terms.is_empty());
    }

    #[test]
    fn test_hyphenated_words_are_not_exclusions() {
        let parsed = parse("well-known issues");
        assert_eq!(parsed.base_terms, vec!["well-known", "issues"]);
        assert!(parsed.excluded_terms.is_empty());
    }

    #[test]
    fn test_exclusions_are_deduplicated_in_order() {
        let parsed = parse("-spam -ads -spam news");
        assert_eq!(parsed.excluded_terms, vec!["spam", "ads"]);
        assert_eq!(parsed.base_terms, vec!["news"]);
    }

    #[test]
    fn test_unterminated_quote_leaves_plain_words() {
        let parsed = parse(r#"rust "unclosed phrase"#);
        assert!(parsed.exact_phrases.is_empty());
        assert_eq!(parsed.base_terms, vec!["rust", "\"unclosed", "phrase"]);
    }

    #[test]
    fn test_empty_and_whitespace_queries_parse_to_nothing() {
        for raw in ["", "   ", "\t\n"] {
            let parsed = parse(raw);
            assert!(parsed.base_terms.is_empty());
            assert!(parsed.site.is_none());
            assert!(parsed.exact_phrases.is_empty());
            assert!(parsed.excluded_terms.is_empty());
        }
    }

    #[test]
    fn test_every_operator_combines_in_one_query() {
        let parsed = parse(
            r#"machine learning site:arxiv.org filetype:pdf intitle:"neural networks" inurl:papers daterange:2023-01-01..2024-01-01 "deep learning" -tensorflow AND pytorch"#,
        );
        assert_eq!(parsed.site.as_deref(), Some("arxiv.org"));
        assert_eq!(parsed.filetype.as_deref(), Some("pdf"));
        assert_eq!(parsed.intitle.as_deref(), Some("neural networks"));
        assert_eq!(parsed.inurl.as_deref(), Some("papers"));
        assert_eq!(parsed.daterange.unwrap().start, "2023-01-01");
        assert_eq!(parsed.exact_phrases, vec!["deep learning"]);
        assert_eq!(parsed.excluded_terms, vec!["tensorflow"]);
        assert_eq!(parsed.operators, vec![BoolOp::And]);
        assert_eq!(parsed.base_terms, vec!["machine", "learning", "pytorch"]);
    }

    #[rstest]
    #[case("plain words", false)]
    #[case("", false)]
    #[case("site:example.com", true)]
    #[case("SITE:example.com", true)]
    #[case("filetype:pdf", true)]
    #[case("intitle:rust", true)]
    #[case("inurl:blog", true)]
    #[case("daterange:2024-01-01..2024-02-01", true)]
    #[case(r#""exact phrase""#, true)]
    #[case("-excluded", true)]
    #[case("well-known", true)]
    fn operator_token_detection(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(has_operator_tokens(raw), expected);
    }

    #[test]
    fn test_stop_keyword_list_is_exhaustive() {
        for keyword in STOP_KEYWORDS {
            let parsed = parse(&format!("{keyword} {} term", keyword.to_uppercase()));
            assert_eq!(parsed.base_terms, vec!["term"], "keyword {keyword}");
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_parse_never_panics(raw in "\\PC*") {
                let parsed = QueryParser::default().parse(&raw);
                prop_assert_eq!(parsed.original, raw);
            }

            #[test]
            fn test_parse_then_compile_is_total(raw in ".*") {
                let parsed = QueryParser::default().parse(&raw);
                let _ = crate::compiler::compile(&parsed);
            }
        }
    }
}
