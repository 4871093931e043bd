//! PageRank
//!
//! Power iteration with a damping factor, run for a fixed number of
//! rounds. Out-degree counts every edge a page has, dangling targets
//! included, so rank pushed through a link to an uncrawled page leaves
//! the system instead of being redistributed. On a corpus with many
//! frontier links the ranks therefore sum to less than one, which is the
//! honest picture of a partial crawl.

use std::collections::HashMap;

use crate::graph::LinkGraph;

/// Default damping factor.
pub const DEFAULT_DAMPING: f64 = 0.85;

/// Default number of power iterations.
pub const DEFAULT_ITERATIONS: usize = 20;

/// Compute PageRank for every crawled node.
///
/// Ranks start uniform at `1/N` and every round is a simultaneous
/// update: each node's new rank is computed from the previous round
/// only. An empty graph yields an empty map.
pub fn compute(graph: &LinkGraph, iterations: usize, damping: f64) -> HashMap<String, f64> {
    let node_count = graph.node_count();
    if node_count == 0 {
        return HashMap::new();
    }

    let mut out_degree: HashMap<&str, usize> = HashMap::new();
    for edge in graph.edges() {
        *out_degree.entry(edge.source.as_str()).or_insert(0) += 1;
    }

    // Incoming adjacency for crawled targets only; a dangling target has
    // no rank bucket to receive anything.
    let mut incoming: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges() {
        if graph.contains(&edge.target) {
            incoming
                .entry(edge.target.as_str())
                .or_default()
                .push(edge.source.as_str());
        }
    }

    let initial = 1.0 / node_count as f64;
    let base = (1.0 - damping) / node_count as f64;
    let mut ranks: HashMap<&str, f64> = graph
        .nodes()
        .iter()
        .map(|node| (node.id.as_str(), initial))
        .collect();

    for _ in 0..iterations {
        let mut next: HashMap<&str, f64> = HashMap::with_capacity(node_count);
        for node in graph.nodes() {
            let inbound = incoming
                .get(node.id.as_str())
                .map(|sources| {
                    sources
                        .iter()
                        .filter_map(|&source| {
                            let rank = ranks.get(source)?;
                            let degree = out_degree.get(source)?;
                            Some(*rank / *degree as f64)
                        })
                        .sum()
                })
                .unwrap_or(0.0);
            next.insert(node.id.as_str(), base + damping * inbound);
        }
        ranks = next;
    }

    ranks
        .into_iter()
        .map(|(url, rank)| (url.to_string(), rank))
        .collect()
}
