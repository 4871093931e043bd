//! Command-line interface
//!
//! Thin wrappers over the engine facade: every subcommand opens the
//! corpus, runs one operation, and prints to stdout. Logs go to stderr
//! so piped output stays clean.

use anyhow::Context;
use anyhow::Result as AnyhowResult;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use lerequete::ParsedQuery;

use crate::config::EngineConfig;
use crate::engine::SearchEngine;

/// LeMoteur - Web Search Engine
#[derive(Parser, Debug)]
#[command(name = "lemoteur")]
#[command(author = "LeMoteur Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search a crawled corpus and analyze its link graph", long_about = None)]
pub struct Cli {
    /// Path to the JSON corpus file
    #[arg(global = true, long = "index", short = 'i', default_value = "corpus.json")]
    pub index: PathBuf,

    /// Path to a TOML config file (environment variables apply otherwise)
    #[arg(global = true, long = "config", short = 'c')]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the corpus
    Search {
        /// Search query, operators included
        #[arg(value_name = "QUERY")]
        query: String,

        /// Maximum number of results (defaults to the configured page size)
        #[arg(long = "limit", short = 'n')]
        limit: Option<usize>,

        /// Number of results to skip
        #[arg(long = "offset", default_value = "0")]
        offset: usize,

        /// Show a score explanation for every hit
        #[arg(long = "explain")]
        explain: bool,
    },

    /// Suggest term completions for a prefix
    Suggest {
        /// Term prefix
        #[arg(value_name = "PREFIX")]
        prefix: String,

        /// Maximum number of suggestions
        #[arg(long = "limit", short = 'n')]
        limit: Option<usize>,
    },

    /// Show corpus and link graph statistics
    Stats,

    /// Export the link graph as JSON
    Graph,

    /// Rank pages by PageRank
    Pagerank {
        /// Number of pages to show
        #[arg(long = "top", default_value = "10")]
        top: usize,
    },

    /// Find the shortest link path between two pages
    Path {
        /// Starting URL
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Destination URL
        #[arg(value_name = "TARGET")]
        target: String,
    },

    /// Group crawled pages by domain
    Clusters,
}

impl Cli {
    /// Run the CLI
    pub fn run(self) -> AnyhowResult<()> {
        // Initialize logging
        init_logging_impl(self.verbose);

        let config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => EngineConfig::from_env(),
        };

        let engine = SearchEngine::open_with_config(&self.index, config)
            .with_context(|| format!("Failed to open index at {}", self.index.display()))?;

        match self.command {
            Commands::Search {
                query,
                limit,
                offset,
                explain,
            } => cmd_search_impl(&engine, &query, limit, offset, explain),
            Commands::Suggest { prefix, limit } => cmd_suggest_impl(&engine, &prefix, limit),
            Commands::Stats => cmd_stats_impl(&engine),
            Commands::Graph => cmd_graph_impl(&engine),
            Commands::Pagerank { top } => cmd_pagerank_impl(&engine, top),
            Commands::Path { source, target } => cmd_path_impl(&engine, &source, &target),
            Commands::Clusters => cmd_clusters_impl(&engine),
        }
    }
}

/// Initialize logging implementation
fn init_logging_impl(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Search command implementation
fn cmd_search_impl(
    engine: &SearchEngine,
    query: &str,
    limit: Option<usize>,
    offset: usize,
    explain: bool,
) -> AnyhowResult<()> {
    info!("Searching for: {}", query);

    let response = engine
        .search(query, limit, offset, explain)
        .context("Search failed")?;

    if response.hits.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("\nFound {} result(s) for: '{}'\n", response.total_hits, response.query);
    if let Some(parsed) = &response.parsed_query {
        println!("Operators: {}\n", describe_operators(parsed));
    }
    if explain {
        println!("Scoring: {}\n", leclassement::Explainer::formula());
    }

    for (i, hit) in response.hits.iter().enumerate() {
        println!("{}. {} ({})", offset + i + 1, hit.title, hit.url);
        println!("   Score: {:.4}", hit.score);
        if !hit.snippet.is_empty() {
            println!("   {}", hit.snippet);
        }
        if let Some(explanation) = &hit.explanation {
            println!(
                "   Breakdown: [IDF: {:.3}, Length norm: {:.3}, Field boost: {:.2}]",
                explanation.breakdown.idf_component,
                explanation.breakdown.length_normalization,
                explanation.breakdown.field_boost
            );
            println!(
                "   Fields: [Title: {:.0}%, Content: {:.0}%]  Length: {} words ({:.2}x avg)",
                explanation.field_contributions.title_share * 100.0,
                explanation.field_contributions.content_share * 100.0,
                explanation.document_stats.content_words,
                explanation.document_stats.length_ratio
            );
            for term in &explanation.matched_terms {
                println!(
                    "   - '{}': {} in content, {} in title, {} ({} doc(s), idf {:.3})",
                    term.term,
                    term.content_occurrences,
                    term.title_occurrences,
                    term.rarity,
                    term.doc_frequency,
                    term.idf
                );
            }
        }
        println!();
    }

    Ok(())
}

/// Suggest command implementation
fn cmd_suggest_impl(engine: &SearchEngine, prefix: &str, limit: Option<usize>) -> AnyhowResult<()> {
    let suggestions = engine.autocomplete(prefix, limit);

    if suggestions.is_empty() {
        println!("No suggestions for: {}", prefix);
        return Ok(());
    }

    for suggestion in &suggestions {
        println!("{}", suggestion);
    }

    Ok(())
}

/// Stats command implementation
fn cmd_stats_impl(engine: &SearchEngine) -> AnyhowResult<()> {
    let summary = engine.graph_summary();
    let stats = engine.graph_statistics();

    println!("\nLeMoteur Index Statistics\n");
    println!("Documents: {}", engine.doc_count());
    println!("\nLink Graph:");
    println!("  Nodes: {}", stats.total_nodes);
    println!("  Edges: {}", stats.total_edges);
    println!("  Density: {:.4}", stats.density);
    println!("  Avg in-degree: {:.2}", stats.avg_in_degree);
    println!("  Avg out-degree: {:.2}", stats.avg_out_degree);

    if !summary.domains.is_empty() {
        println!("\nDomains:");
        for (domain, pages) in &summary.domains {
            println!("  {}: {} page(s)", domain, pages);
        }
    }

    if !stats.top_hubs.is_empty() {
        println!("\nTop hubs (outgoing links):");
        for (i, hub) in stats.top_hubs.iter().enumerate() {
            println!("  {}. {} ({})", i + 1, hub.url, hub.out_degree);
        }
    }

    if !stats.top_authorities.is_empty() {
        println!("\nTop authorities (incoming links):");
        for (i, authority) in stats.top_authorities.iter().enumerate() {
            println!("  {}. {} ({})", i + 1, authority.url, authority.in_degree);
        }
    }

    Ok(())
}

/// Graph export command implementation
fn cmd_graph_impl(engine: &SearchEngine) -> AnyhowResult<()> {
    let graph = engine.graph();
    let json = serde_json::to_string_pretty(&graph).context("Failed to serialize graph")?;
    println!("{}", json);
    Ok(())
}

/// Pagerank command implementation
fn cmd_pagerank_impl(engine: &SearchEngine, top: usize) -> AnyhowResult<()> {
    let ranked = engine.pagerank();

    if ranked.is_empty() {
        println!("The link graph is empty.");
        return Ok(());
    }

    println!("\nPageRank (top {}):\n", top);
    for (i, (url, rank)) in ranked.iter().take(top).enumerate() {
        println!("{:>3}. {:.6}  {}", i + 1, rank, url);
    }

    Ok(())
}

/// Path command implementation
fn cmd_path_impl(engine: &SearchEngine, source: &str, target: &str) -> AnyhowResult<()> {
    match engine.shortest_path(source, target) {
        Some(path) => {
            println!("\nShortest path ({} hop(s)):\n", path.len().saturating_sub(1));
            for (i, url) in path.iter().enumerate() {
                if i == 0 {
                    println!("  {}", url);
                } else {
                    println!("  -> {}", url);
                }
            }
        }
        None => println!("No link path from {} to {}", source, target),
    }

    Ok(())
}

/// Clusters command implementation
fn cmd_clusters_impl(engine: &SearchEngine) -> AnyhowResult<()> {
    let clusters = engine.domain_clusters();

    if clusters.is_empty() {
        println!("The index is empty.");
        return Ok(());
    }

    println!("\n{} domain(s):\n", clusters.len());
    for (domain, urls) in &clusters {
        println!("{} ({} page(s))", domain, urls.len());
        for url in urls {
            println!("  {}", url);
        }
        println!();
    }

    Ok(())
}

/// Echo parsed operators back in canonical form
fn describe_operators(parsed: &ParsedQuery) -> String {
    let mut pieces = Vec::new();
    if let Some(site) = &parsed.site {
        pieces.push(format!("site:{}", site));
    }
    if let Some(filetype) = &parsed.filetype {
        pieces.push(format!("filetype:{}", filetype));
    }
    if let Some(intitle) = &parsed.intitle {
        if intitle.contains(char::is_whitespace) {
            pieces.push(format!("intitle:\"{}\"", intitle));
        } else {
            pieces.push(format!("intitle:{}", intitle));
        }
    }
    if let Some(inurl) = &parsed.inurl {
        pieces.push(format!("inurl:{}", inurl));
    }
    if let Some(range) = &parsed.daterange {
        pieces.push(format!("daterange:{}..{}", range.start, range.end));
    }
    for phrase in &parsed.exact_phrases {
        pieces.push(format!("\"{}\"", phrase));
    }
    for excluded in &parsed.excluded_terms {
        pieces.push(format!("-{}", excluded));
    }
    pieces.join(" ")
}
