//! Degree statistics
//!
//! Degree counting runs over the full edge set, dangling edges included,
//! but only crawled nodes are reported: an uncrawled URL can accumulate
//! in-links without ever appearing in the rankings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::LinkGraph;

/// How many nodes each top-N ranking reports.
pub const TOP_NODES: usize = 10;

/// A page ranked by outgoing links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubEntry {
    /// Page URL
    pub url: String,

    /// Number of outgoing links, dangling included
    pub out_degree: usize,
}

/// A page ranked by incoming links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityEntry {
    /// Page URL
    pub url: String,

    /// Number of incoming links from crawled pages
    pub in_degree: usize,
}

/// Shape metrics for a link graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStatistics {
    /// Number of crawled pages
    pub total_nodes: usize,

    /// Number of links, dangling included
    pub total_edges: usize,

    /// Edges over possible ordered node pairs
    pub density: f64,

    /// Mean in-degree over crawled pages
    pub avg_in_degree: f64,

    /// Mean out-degree over crawled pages
    pub avg_out_degree: f64,

    /// Crawled pages with the most outgoing links
    pub top_hubs: Vec<HubEntry>,

    /// Crawled pages with the most incoming links
    pub top_authorities: Vec<AuthorityEntry>,
}

impl GraphStatistics {
    /// Measure a graph.
    ///
    /// Top rankings are sorted by degree descending and truncated to
    /// [`TOP_NODES`]; ties keep node insertion order.
    pub fn from_graph(graph: &LinkGraph) -> Self {
        let total_nodes = graph.node_count();
        let total_edges = graph.edge_count();

        let mut out_degree: HashMap<&str, usize> = HashMap::new();
        let mut in_degree: HashMap<&str, usize> = HashMap::new();
        for edge in graph.edges() {
            *out_degree.entry(edge.source.as_str()).or_insert(0) += 1;
            *in_degree.entry(edge.target.as_str()).or_insert(0) += 1;
        }

        let mut top_hubs: Vec<HubEntry> = graph
            .nodes()
            .iter()
            .map(|node| HubEntry {
                url: node.id.clone(),
                out_degree: out_degree.get(node.id.as_str()).copied().unwrap_or(0),
            })
            .collect();
        let mut top_authorities: Vec<AuthorityEntry> = graph
            .nodes()
            .iter()
            .map(|node| AuthorityEntry {
                url: node.id.clone(),
                in_degree: in_degree.get(node.id.as_str()).copied().unwrap_or(0),
            })
            .collect();

        let known_out: usize = top_hubs.iter().map(|h| h.out_degree).sum();
        let known_in: usize = top_authorities.iter().map(|a| a.in_degree).sum();

        top_hubs.sort_by(|a, b| b.out_degree.cmp(&a.out_degree));
        top_hubs.truncate(TOP_NODES);
        top_authorities.sort_by(|a, b| b.in_degree.cmp(&a.in_degree));
        top_authorities.truncate(TOP_NODES);

        let node_div = total_nodes.max(1) as f64;
        let pair_div = (total_nodes * total_nodes.saturating_sub(1)).max(1) as f64;

        Self {
            total_nodes,
            total_edges,
            density: total_edges as f64 / pair_div,
            avg_in_degree: known_in as f64 / node_div,
            avg_out_degree: known_out as f64 / node_div,
            top_hubs,
            top_authorities,
        }
    }
}
