//! In-memory reference store
//!
//! *La Mémoire* (The Memory) - A complete [`TextIndex`] implementation
//! over a JSON corpus file. It backs the integration tests and the
//! command-line tools; production deployments put a real index behind the
//! same trait.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use tracing::info;

use crate::document::StoredDocument;
use crate::error::StoreError;
use crate::index::{IndexHit, TextIndex};
use crate::predicate::{Field, Predicate};

/// BM25 term-frequency saturation parameter
const K1: f64 = 1.2;

/// BM25 length normalization strength
const B: f64 = 0.75;

/// Weight of a title occurrence relative to a content occurrence
const TITLE_WEIGHT: u32 = 2;

/// Score assigned to matches of filter-only predicates
const FILTER_SCORE: f64 = 1.0;

/// Words kept before the first match in a highlight excerpt
const HIGHLIGHT_BEFORE: usize = 8;

/// Words kept from the first match onward in a highlight excerpt
const HIGHLIGHT_AFTER: usize = 24;

/// Posting list entry: one document containing a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Posting {
    doc_id: usize,
    term_frequency: u32,
}

/// An in-memory inverted index over a document collection.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docs: Vec<StoredDocument>,
    by_url: HashMap<String, usize>,
    title_postings: BTreeMap<String, Vec<Posting>>,
    content_postings: BTreeMap<String, Vec<Posting>>,
    content_lengths: Vec<usize>,
    total_content_length: usize,
}

/// Lowercased word tokens: maximal runs of alphanumeric characters or `_`.
///
/// The same tokenizer is used for indexing, phrase matching and term
/// dictionaries, so a token found through one path is found through all.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl MemoryIndex {
    /// Load a corpus from a JSON file holding an array of documents.
    ///
    /// A missing path is fatal ([`StoreError::NotFound`]); malformed JSON
    /// is [`StoreError::Corrupt`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let docs: Vec<StoredDocument> =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                reason: e.to_string(),
            })?;
        info!(path = %path.display(), documents = docs.len(), "corpus loaded");
        Ok(Self::from_documents(docs))
    }

    /// Build an index directly from documents.
    ///
    /// URLs are unique: a later document with an already-seen URL replaces
    /// the earlier one, as a re-crawl would.
    pub fn from_documents(docs: Vec<StoredDocument>) -> Self {
        let mut unique: Vec<StoredDocument> = Vec::with_capacity(docs.len());
        let mut by_url: HashMap<String, usize> = HashMap::with_capacity(docs.len());
        for doc in docs {
            match by_url.get(&doc.url) {
                Some(&existing) => unique[existing] = doc,
                None => {
                    by_url.insert(doc.url.clone(), unique.len());
                    unique.push(doc);
                }
            }
        }

        let mut index = Self {
            docs: unique,
            by_url,
            ..Self::default()
        };
        for doc_id in 0..index.docs.len() {
            let title_counts = count_tokens(&index.docs[doc_id].title);
            let content_counts = count_tokens(&index.docs[doc_id].content);
            let length: usize = content_counts.values().map(|&c| c as usize).sum();
            index.content_lengths.push(length);
            index.total_content_length += length;
            insert_postings(&mut index.title_postings, doc_id, title_counts);
            insert_postings(&mut index.content_postings, doc_id, content_counts);
        }
        index
    }

    fn postings(&self, field: Field) -> &BTreeMap<String, Vec<Posting>> {
        match field {
            Field::Title => &self.title_postings,
            Field::Content => &self.content_postings,
        }
    }

    fn term_frequency(&self, field: Field, token: &str, doc_id: usize) -> u32 {
        self.postings(field)
            .get(token)
            .and_then(|list| {
                list.binary_search_by_key(&doc_id, |p| p.doc_id)
                    .ok()
                    .map(|i| list[i].term_frequency)
            })
            .unwrap_or(0)
    }

    fn has_term(&self, field: Field, token: &str, doc_id: usize) -> bool {
        self.term_frequency(field, token, doc_id) > 0
    }

    fn matches(&self, doc_id: usize, predicate: &Predicate) -> bool {
        let doc = &self.docs[doc_id];
        match predicate {
            Predicate::All => true,
            Predicate::FullText(terms) => terms.iter().all(|term| {
                tokenize(term).iter().all(|token| {
                    self.has_term(Field::Content, token, doc_id)
                        || self.has_term(Field::Title, token, doc_id)
                })
            }),
            Predicate::InTitle(terms) => terms.iter().all(|term| {
                tokenize(term)
                    .iter()
                    .all(|token| self.has_term(Field::Title, token, doc_id))
            }),
            Predicate::Domain(site) => doc.url.to_lowercase().contains(&site.to_lowercase()),
            Predicate::FileType(ext) => {
                let suffix = format!(".{}", ext.to_lowercase());
                doc.url.to_lowercase().ends_with(&suffix)
            }
            Predicate::UrlContains(fragment) => {
                doc.url.to_lowercase().contains(&fragment.to_lowercase())
            }
            Predicate::DateRange { start, end } => {
                let date = doc.crawled_at.date_naive();
                date >= *start && date <= *end
            }
            Predicate::Phrase(terms) => {
                let needle: Vec<String> = terms.iter().flat_map(|t| tokenize(t)).collect();
                if needle.is_empty() {
                    return true;
                }
                let haystack = tokenize(&doc.content);
                haystack.windows(needle.len()).any(|w| w == needle.as_slice())
            }
            Predicate::Not(term) => match tokenize(term).first() {
                Some(token) => !self.has_term(Field::Content, token, doc_id),
                None => true,
            },
            Predicate::And(clauses) => clauses.iter().all(|c| self.matches(doc_id, c)),
        }
    }

    /// BM25 over content with title occurrences folded in at double
    /// weight. Document length and document frequency come from the
    /// content field.
    fn bm25(&self, doc_id: usize, terms: &[String]) -> f64 {
        let n = self.docs.len() as f64;
        let avg_length = if self.docs.is_empty() {
            0.0
        } else {
            self.total_content_length as f64 / self.docs.len() as f64
        };
        let doc_length = self.content_lengths[doc_id] as f64;
        let length_ratio = if avg_length > 0.0 {
            doc_length / avg_length
        } else {
            0.0
        };

        let mut score = 0.0;
        for term in terms {
            let tf = self.term_frequency(Field::Content, term, doc_id)
                + TITLE_WEIGHT * self.term_frequency(Field::Title, term, doc_id);
            if tf == 0 {
                continue;
            }
            let df = self
                .content_postings
                .get(term)
                .map_or(0, |list| list.len()) as f64;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            let tf = tf as f64;
            let tf_norm = (tf * (K1 + 1.0)) / (tf + K1 * (1.0 - B + B * length_ratio));
            score += idf * tf_norm;
        }
        score
    }

    /// Plain-text excerpt around the first word matching any query term.
    fn highlight(&self, doc_id: usize, terms: &[String]) -> Option<String> {
        let content = &self.docs[doc_id].content;
        let words: Vec<&str> = content.split_whitespace().collect();
        let position = words.iter().position(|word| {
            let tokens = tokenize(word);
            terms.iter().any(|t| tokens.contains(t))
        })?;

        let start = position.saturating_sub(HIGHLIGHT_BEFORE);
        let end = (position + HIGHLIGHT_AFTER).min(words.len());
        let mut excerpt = words[start..end].join(" ");
        if start > 0 {
            excerpt = format!("...{excerpt}");
        }
        if end < words.len() {
            excerpt = format!("{excerpt}...");
        }
        Some(excerpt)
    }
}

fn count_tokens(text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

fn insert_postings(
    postings: &mut BTreeMap<String, Vec<Posting>>,
    doc_id: usize,
    counts: HashMap<String, u32>,
) {
    for (term, term_frequency) in counts {
        postings.entry(term).or_default().push(Posting {
            doc_id,
            term_frequency,
        });
    }
}

/// Collect the distinct tokens of every relevance clause, in clause order.
fn relevance_terms(predicate: &Predicate, terms: &mut Vec<String>) {
    match predicate {
        Predicate::FullText(raw) | Predicate::InTitle(raw) | Predicate::Phrase(raw) => {
            for term in raw {
                for token in tokenize(term) {
                    if !terms.contains(&token) {
                        terms.push(token);
                    }
                }
            }
        }
        Predicate::And(clauses) => {
            for clause in clauses {
                relevance_terms(clause, terms);
            }
        }
        _ => {}
    }
}

impl TextIndex for MemoryIndex {
    fn doc_count(&self) -> usize {
        self.docs.len()
    }

    fn doc_frequency(&self, field: Field, term: &str) -> usize {
        match tokenize(term).first() {
            Some(token) => self.postings(field).get(token).map_or(0, Vec::len),
            None => 0,
        }
    }

    fn terms(&self, field: Field) -> Vec<String> {
        self.postings(field).keys().cloned().collect()
    }

    fn documents(&self) -> Box<dyn Iterator<Item = Result<StoredDocument, StoreError>> + '_> {
        Box::new(self.docs.iter().cloned().map(Ok))
    }

    fn get(&self, url: &str) -> Result<Option<StoredDocument>, StoreError> {
        Ok(self.by_url.get(url).map(|&i| self.docs[i].clone()))
    }

    fn execute(
        &self,
        predicate: &Predicate,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<IndexHit>, StoreError> {
        let mut terms = Vec::new();
        relevance_terms(predicate, &mut terms);

        let mut hits = Vec::new();
        for doc_id in 0..self.docs.len() {
            if !self.matches(doc_id, predicate) {
                continue;
            }
            let (score, highlight) = if terms.is_empty() {
                (FILTER_SCORE, None)
            } else {
                (self.bm25(doc_id, &terms), self.highlight(doc_id, &terms))
            };
            hits.push(IndexHit {
                doc: self.docs[doc_id].clone(),
                score,
                highlight,
            });
        }

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc.url.cmp(&b.doc.url))
        });

        Ok(hits.into_iter().skip(offset).take(limit).collect())
    }
}
