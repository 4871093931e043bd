//! Shortest paths
//!
//! Unweighted breadth-first search over the link direction. Dangling
//! edges are not walkable: a path can only pass through pages that were
//! actually crawled.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::LinkGraph;

/// Find a shortest link path from `source` to `target`.
///
/// Returns the full URL sequence including both endpoints, or `None`
/// when no path exists. Asking for a path from a URL to itself yields
/// the single-element path even when the URL was never crawled.
pub fn shortest_path(graph: &LinkGraph, source: &str, target: &str) -> Option<Vec<String>> {
    if source == target {
        return Some(vec![source.to_string()]);
    }
    if !graph.contains(source) {
        return None;
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges() {
        if graph.contains(&edge.target) {
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    visited.insert(source);
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let Some(neighbors) = adjacency.get(current) else {
            continue;
        };
        for &neighbor in neighbors {
            if !visited.insert(neighbor) {
                continue;
            }
            parent.insert(neighbor, current);
            if neighbor == target {
                return Some(reconstruct(&parent, source, target));
            }
            queue.push_back(neighbor);
        }
    }
    None
}

fn reconstruct(parent: &HashMap<&str, &str>, source: &str, target: &str) -> Vec<String> {
    let mut path = vec![target.to_string()];
    let mut current = target;
    while current != source {
        match parent.get(current) {
            Some(&previous) => {
                path.push(previous.to_string());
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
