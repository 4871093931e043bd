//! Domain clustering
//!
//! Groups crawled pages by host. The map is ordered so cluster output
//! is stable across runs.

use std::collections::BTreeMap;

use crate::graph::LinkGraph;

/// Group node URLs by their domain.
///
/// Domains come back in lexicographic order; within a cluster, URLs keep
/// node insertion order.
pub fn by_domain(graph: &LinkGraph) -> BTreeMap<String, Vec<String>> {
    let mut clusters: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for node in graph.nodes() {
        clusters
            .entry(node.domain.clone())
            .or_default()
            .push(node.id.clone());
    }
    clusters
}
