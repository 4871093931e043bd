//! Engine facade
//!
//! One handle over the whole stack: the document store underneath, the
//! ranking pipeline for queries, and the link-graph analyses. Graphs are
//! rebuilt from the store on each request rather than cached; the store
//! is the single source of truth.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use leclassement::{Ranker, SearchResponse};
use lecorpus::{MemoryIndex, TextIndex};
use letoile::{by_domain, GraphBuilder, GraphStatistics, GraphSummary, LinkGraph};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// The search engine facade.
pub struct SearchEngine {
    index: Arc<dyn TextIndex>,
    ranker: Ranker,
    config: EngineConfig,
}

impl SearchEngine {
    /// Open an engine over a JSON corpus file with environment config.
    pub fn open(index_path: &Path) -> Result<Self, EngineError> {
        Self::open_with_config(index_path, EngineConfig::from_env())
    }

    /// Open an engine over a JSON corpus file with explicit config.
    ///
    /// A missing or unreadable corpus is fatal here; queries later on
    /// never are.
    pub fn open_with_config(index_path: &Path, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Config)?;
        let index = MemoryIndex::open(index_path)?;
        Ok(Self::with_index(Arc::new(index), config))
    }

    /// Build an engine over an already-open store.
    pub fn with_index(index: Arc<dyn TextIndex>, config: EngineConfig) -> Self {
        let ranker = Ranker::with_snippet_length(Arc::clone(&index), config.snippet_length);
        info!(documents = index.doc_count(), "search engine ready");
        Self {
            index,
            ranker,
            config,
        }
    }

    /// Run a search. `limit` falls back to the configured page size.
    pub fn search(
        &self,
        query: &str,
        limit: Option<usize>,
        offset: usize,
        explain: bool,
    ) -> Result<SearchResponse, EngineError> {
        let limit = limit.unwrap_or(self.config.page_size);
        Ok(self.ranker.search(query, limit, offset, explain)?)
    }

    /// Complete a term prefix. `limit` falls back to the configured
    /// suggestion count.
    pub fn autocomplete(&self, prefix: &str, limit: Option<usize>) -> Vec<String> {
        let limit = limit.unwrap_or(self.config.max_suggestions);
        self.ranker.autocomplete(prefix, limit)
    }

    /// Number of documents in the store.
    pub fn doc_count(&self) -> usize {
        self.index.doc_count()
    }

    /// Build the link graph from the current store contents.
    pub fn graph(&self) -> LinkGraph {
        GraphBuilder::build(self.index.as_ref())
    }

    /// Aggregate link graph counts.
    pub fn graph_summary(&self) -> GraphSummary {
        self.graph().summary()
    }

    /// PageRank over the link graph, highest rank first.
    ///
    /// Ties are broken by URL so the ordering is reproducible.
    pub fn pagerank(&self) -> Vec<(String, f64)> {
        let graph = self.graph();
        let ranks = letoile::compute(
            &graph,
            self.config.pagerank_iterations,
            self.config.pagerank_damping,
        );
        let mut ranked: Vec<(String, f64)> = ranks.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }

    /// Degree statistics for the link graph.
    pub fn graph_statistics(&self) -> GraphStatistics {
        GraphStatistics::from_graph(&self.graph())
    }

    /// Shortest link path between two URLs, if one exists.
    pub fn shortest_path(&self, source: &str, target: &str) -> Option<Vec<String>> {
        letoile::shortest_path(&self.graph(), source, target)
    }

    /// Crawled URLs grouped by domain.
    pub fn domain_clusters(&self) -> BTreeMap<String, Vec<String>> {
        by_domain(&self.graph())
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
