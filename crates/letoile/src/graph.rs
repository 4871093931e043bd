//! Link graph model
//!
//! A directed graph over crawled pages. Node identity is the document
//! URL. Edge targets are free-form: a link to a page that was never
//! crawled stays in the edge list as a dangling edge, and the analyses
//! that care (PageRank, statistics) decide how to treat it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Maximum node label length before truncation.
pub const LABEL_LENGTH: usize = 50;

/// A crawled page in the link graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node identifier: the document URL
    pub id: String,

    /// Display label: the document title, truncated for rendering
    pub label: String,

    /// Host part of the URL, lowercased
    pub domain: String,

    /// Content size in words
    pub size: usize,
}

/// A directed link between two pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    /// URL of the linking page
    pub source: String,

    /// URL the link points at, crawled or not
    pub target: String,

    /// Link weight
    pub weight: u32,
}

/// Aggregate counts for a quick look at graph shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Number of crawled pages
    pub total_nodes: usize,

    /// Number of links, dangling included
    pub total_edges: usize,

    /// Page count per domain
    pub domains: BTreeMap<String, usize>,

    /// Edges per node
    pub avg_degree: f64,
}

/// A directed link graph built from the crawled corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl LinkGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. A node with an id already present is ignored.
    pub fn push_node(&mut self, node: GraphNode) {
        if self.index.contains_key(&node.id) {
            return;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    /// Add an edge. The target does not have to be a known node.
    pub fn push_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }

    /// Whether a URL is a crawled node in this graph.
    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, dangling included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Aggregate counts: sizes, domain breakdown, average degree.
    pub fn summary(&self) -> GraphSummary {
        let mut domains: BTreeMap<String, usize> = BTreeMap::new();
        for node in &self.nodes {
            *domains.entry(node.domain.clone()).or_insert(0) += 1;
        }
        GraphSummary {
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            domains,
            avg_degree: self.edges.len() as f64 / self.nodes.len().max(1) as f64,
        }
    }
}

/// Truncate a title to [`LABEL_LENGTH`] characters, marking the cut with
/// an ellipsis.
pub(crate) fn label_of(title: &str) -> String {
    let mut chars = title.chars();
    let label: String = chars.by_ref().take(LABEL_LENGTH).collect();
    if chars.next().is_some() {
        format!("{label}...")
    } else {
        label
    }
}
