//! Stored document model
//!
//! *Le Document* (The Document) - One crawled page as the store returns
//! it: text fields, outgoing links and the crawl timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A crawled web document.
///
/// The URL doubles as the document identifier and is unique within a
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Canonical URL, unique within the store
    pub url: String,

    /// Page title
    pub title: String,

    /// Extracted text content
    pub content: String,

    /// Outgoing link URLs, in page order
    #[serde(default)]
    pub links: Vec<String>,

    /// When the page was crawled (UTC)
    pub crawled_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Number of whitespace-separated words in the content.
    pub fn content_word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Host part of the document URL.
    pub fn host(&self) -> String {
        host_of(&self.url)
    }
}

/// Extract the host part of a URL.
///
/// Takes the text after `://` (or the whole string when no scheme is
/// present) up to the first `/`, `?` or `#`, lowercased. Good enough for
/// grouping crawled pages by site without a full URL parser.
pub fn host_of(url: &str) -> String {
    let rest = match url.find("://") {
        Some(pos) => &url[pos + 3..],
        None => url,
    };
    let end = rest
        .find(['/', '?', '#'])
        .unwrap_or(rest.len());
    rest[..end].to_lowercase()
}
