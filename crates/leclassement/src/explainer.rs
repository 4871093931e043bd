//! BM25 score explanation
//!
//! Rebuilds the "why" of a score from corpus statistics visible through
//! the store boundary: per-term occurrence counts, document frequencies,
//! idf, length normalization and field boosts, plus a rarity class per
//! matched term.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use lecorpus::{Field, StoredDocument, TextIndex};

/// BM25 term-frequency saturation parameter.
pub const K1: f64 = 1.2;

/// BM25 length normalization strength.
pub const B: f64 = 0.75;

/// Boost applied when query terms appear in the title.
pub const TITLE_BOOST: f64 = 2.0;

/// Documents sampled when estimating the average document length.
const AVG_LENGTH_SAMPLE: usize = 100;

/// Average length assumed when nothing could be sampled.
const AVG_LENGTH_FALLBACK: f64 = 100.0;

/// How common a term is across the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Not present in any document
    NotFound,
    /// Under 1% of documents
    VeryRare,
    /// Under 5% of documents
    Rare,
    /// Under 20% of documents
    Common,
    /// 20% of documents or more
    VeryCommon,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::NotFound => "not_found",
            Rarity::VeryRare => "very_rare",
            Rarity::Rare => "rare",
            Rarity::Common => "common",
            Rarity::VeryCommon => "very_common",
        };
        f.write_str(name)
    }
}

/// One query term's occurrence profile in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermMatch {
    /// The query term, lowercased
    pub term: String,

    /// Non-overlapping occurrences in the content
    pub content_occurrences: usize,

    /// Non-overlapping occurrences in the title
    pub title_occurrences: usize,

    /// Documents containing the term in their content
    pub doc_frequency: usize,

    /// Inverse document frequency
    pub idf: f64,

    /// Corpus-wide rarity class
    pub rarity: Rarity,
}

/// The factors behind a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Term-frequency contribution. Raw per-document term frequencies are
    /// not observable through the store boundary, so this is always 0.0;
    /// the occurrence counts on [`TermMatch`] carry the visible signal.
    pub term_frequency_component: f64,

    /// Sum of idf over matched terms present in the corpus
    pub idf_component: f64,

    /// Length normalization factor relative to the average document
    pub length_normalization: f64,

    /// 2.0 when any matched term appears in the title, else 1.0
    pub field_boost: f64,
}

/// Score split between title and content matches.
///
/// Title occurrences weigh double, mirroring the field boost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldContributions {
    /// Share of the score attributed to title occurrences
    pub title_share: f64,

    /// Share of the score attributed to content occurrences
    pub content_share: f64,
}

/// Document size in the context of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Whitespace-separated words in the content
    pub content_words: usize,

    /// Whitespace-separated words in the title
    pub title_words: usize,

    /// Estimated corpus average content length
    pub estimated_avg_doc_length: f64,

    /// Document length over the estimated average
    pub length_ratio: f64,
}

/// Why a document scored what it scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreExplanation {
    /// 1-based rank of the hit within its page
    pub position: usize,

    /// The score being explained
    pub score: f64,

    /// Matched query terms, rarest first
    pub matched_terms: Vec<TermMatch>,

    /// Factor breakdown
    pub breakdown: ScoreBreakdown,

    /// Title/content split of the score
    pub field_contributions: FieldContributions,

    /// Document size context
    pub document_stats: DocumentStats,
}

/// Builds score explanations from corpus statistics.
pub struct Explainer {
    index: Arc<dyn TextIndex>,
}

impl Explainer {
    /// Create an explainer over a store.
    pub fn new(index: Arc<dyn TextIndex>) -> Self {
        Self { index }
    }

    /// Explain one hit's score.
    ///
    /// `position` is the 1-based rank of the hit within its result page.
    pub fn explain(
        &self,
        doc: &StoredDocument,
        score: f64,
        query_terms: &[String],
        position: usize,
    ) -> ScoreExplanation {
        let matched_terms = self.matching_terms(doc, query_terms);
        let avg_length = self.estimate_average_doc_length();
        let content_words = doc.content_word_count();
        let title_words = doc.title.split_whitespace().count();
        let length_ratio = content_words as f64 / avg_length;

        let idf_component = matched_terms
            .iter()
            .filter(|t| t.doc_frequency > 0)
            .map(|t| t.idf)
            .sum();
        let field_boost = if matched_terms.iter().any(|t| t.title_occurrences > 0) {
            TITLE_BOOST
        } else {
            1.0
        };

        ScoreExplanation {
            position,
            score,
            breakdown: ScoreBreakdown {
                term_frequency_component: 0.0,
                idf_component,
                length_normalization: 1.0 / (1.0 + B * (length_ratio - 1.0)),
                field_boost,
            },
            field_contributions: field_contributions(score, &matched_terms),
            document_stats: DocumentStats {
                content_words,
                title_words,
                estimated_avg_doc_length: avg_length,
                length_ratio,
            },
            matched_terms,
        }
    }

    /// Static description of the scoring formula and its parameters.
    pub fn formula() -> &'static str {
        "BM25: score = sum over query terms of idf(t) * tf(t) * (k1 + 1) / \
         (tf(t) + k1 * (1 - b + b * doc_len / avg_len)), with k1 = 1.2 \
         (term-frequency saturation) and b = 0.75 (length normalization). \
         idf(t) = ln((N - df + 0.5) / (df + 0.5) + 1). Title matches carry \
         a 2.0 field boost."
    }

    /// Occurrence profile of each query term in the document, rarest
    /// first. Terms absent from both fields are dropped.
    fn matching_terms(&self, doc: &StoredDocument, query_terms: &[String]) -> Vec<TermMatch> {
        let total_docs = self.index.doc_count();
        let content = doc.content.to_lowercase();
        let title = doc.title.to_lowercase();

        let mut matches: Vec<TermMatch> = Vec::new();
        for raw in query_terms {
            let term = raw.to_lowercase();
            if term.is_empty() || matches.iter().any(|m| m.term == term) {
                continue;
            }
            let content_occurrences = count_occurrences(&content, &term);
            let title_occurrences = count_occurrences(&title, &term);
            if content_occurrences == 0 && title_occurrences == 0 {
                continue;
            }
            let doc_frequency = self.index.doc_frequency(Field::Content, &term);
            matches.push(TermMatch {
                idf: idf(total_docs, doc_frequency),
                rarity: rarity(doc_frequency, total_docs),
                term,
                content_occurrences,
                title_occurrences,
                doc_frequency,
            });
        }

        matches.sort_by(|a, b| {
            b.idf
                .partial_cmp(&a.idf)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.term.cmp(&b.term))
        });
        matches
    }

    /// Average content length over a sample of at most 100 documents.
    ///
    /// Unreadable documents are skipped; when nothing could be sampled
    /// (or every sampled document is empty) a fixed fallback is used so
    /// downstream ratios stay finite.
    fn estimate_average_doc_length(&self) -> f64 {
        let mut sampled = 0usize;
        let mut total_words = 0usize;
        for doc in self.index.documents().take(AVG_LENGTH_SAMPLE) {
            match doc {
                Ok(doc) => {
                    total_words += doc.content_word_count();
                    sampled += 1;
                }
                Err(_) => continue,
            }
        }
        if sampled == 0 || total_words == 0 {
            return AVG_LENGTH_FALLBACK;
        }
        total_words as f64 / sampled as f64
    }
}

/// BM25 inverse document frequency.
fn idf(total_docs: usize, doc_frequency: usize) -> f64 {
    let n = total_docs as f64;
    let df = doc_frequency as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Classify how common a term is from its document frequency.
fn rarity(doc_frequency: usize, total_docs: usize) -> Rarity {
    if doc_frequency == 0 || total_docs == 0 {
        return Rarity::NotFound;
    }
    let ratio = doc_frequency as f64 / total_docs as f64;
    if ratio < 0.01 {
        Rarity::VeryRare
    } else if ratio < 0.05 {
        Rarity::Rare
    } else if ratio < 0.20 {
        Rarity::Common
    } else {
        Rarity::VeryCommon
    }
}

/// Non-overlapping substring occurrences.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Split a score between fields by weighted occurrence counts, title
/// weighing double. Both shares are zero when nothing matched.
fn field_contributions(score: f64, matched: &[TermMatch]) -> FieldContributions {
    let title_hits: usize = matched.iter().map(|t| t.title_occurrences).sum();
    let content_hits: usize = matched.iter().map(|t| t.content_occurrences).sum();
    let weighted = 2.0 * title_hits as f64 + content_hits as f64;
    if weighted == 0.0 {
        return FieldContributions {
            title_share: 0.0,
            content_share: 0.0,
        };
    }
    let title_share = score * (2.0 * title_hits as f64) / weighted;
    FieldContributions {
        title_share,
        content_share: score - title_share,
    }
}
