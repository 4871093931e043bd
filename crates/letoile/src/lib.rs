//! letoile - Link Graph Analysis
//!
//! *La Toile* (The Web) - Builds a directed link graph from the crawled
//! corpus and runs the classic analyses over it: PageRank, degree
//! statistics, shortest paths, and domain clustering.
//!
//! The graph is rebuilt from the document store on demand. Edges are
//! kept even when their target was never crawled, so rank mass can leak
//! through dangling links exactly as it does on the live web.

#![warn(missing_docs)]

/// Graph construction from a document store
pub mod builder;

/// Domain clustering
pub mod clusters;

/// Graph model types
pub mod graph;

/// PageRank computation
pub mod pagerank;

/// Degree statistics and top-node rankings
pub mod statistics;

/// Breadth-first shortest paths
pub mod traversal;

pub use builder::GraphBuilder;
pub use clusters::by_domain;
pub use graph::{GraphEdge, GraphNode, GraphSummary, LinkGraph};
pub use pagerank::{compute, DEFAULT_DAMPING, DEFAULT_ITERATIONS};
pub use statistics::{AuthorityEntry, GraphStatistics, HubEntry};
pub use traversal::shortest_path;
