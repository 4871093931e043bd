//! Graph construction
//!
//! Walks every document in the store and turns it into a node plus one
//! edge per outgoing link. Links are kept as crawled, so the graph ends
//! up with dangling edges wherever the crawl stopped short.

use tracing::{debug, warn};

use lecorpus::TextIndex;

use crate::graph::{label_of, GraphEdge, GraphNode, LinkGraph};

/// Builds a [`LinkGraph`] from a document store.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Build the full link graph.
    ///
    /// Documents the store cannot read are logged and skipped; one bad
    /// record never costs the whole graph. Blank link entries are
    /// dropped, everything else becomes an edge of weight 1.
    pub fn build(index: &dyn TextIndex) -> LinkGraph {
        let mut graph = LinkGraph::new();
        for doc in index.documents() {
            let doc = match doc {
                Ok(doc) => doc,
                Err(err) => {
                    warn!("Skipping unreadable document: {err}");
                    continue;
                }
            };
            graph.push_node(GraphNode {
                id: doc.url.clone(),
                label: label_of(&doc.title),
                domain: doc.host(),
                size: doc.content_word_count(),
            });
            for link in &doc.links {
                let target = link.trim();
                if target.is_empty() {
                    continue;
                }
                graph.push_edge(GraphEdge {
                    source: doc.url.clone(),
                    target: target.to_string(),
                    weight: 1,
                });
            }
        }
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "link graph built"
        );
        graph
    }
}
