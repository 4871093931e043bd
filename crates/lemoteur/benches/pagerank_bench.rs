use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lemoteur::{MemoryIndex, StoredDocument};
use letoile::{compute, GraphBuilder, DEFAULT_DAMPING, DEFAULT_ITERATIONS};

fn page_url(i: usize) -> String {
    format!("https://site-{i}.example/page")
}

/// Ring topology with a popular hub and a sprinkling of frontier links,
/// seeded so every run benches the same graph.
fn synthetic_corpus(pages: usize) -> Vec<StoredDocument> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..pages)
        .map(|i| {
            let mut links = vec![page_url((i + 1) % pages)];
            if rng.gen_bool(0.3) {
                links.push(page_url(0));
            }
            if rng.gen_bool(0.1) {
                links.push(format!("https://frontier.example/{}", rng.gen_range(0..pages)));
            }
            StoredDocument {
                url: page_url(i),
                title: format!("Page {i}"),
                content: "a steady stream of filler words for the page body".to_string(),
                links,
                crawled_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            }
        })
        .collect()
}

fn bench_graph_build_1k(c: &mut Criterion) {
    let index = MemoryIndex::from_documents(synthetic_corpus(1_000));
    c.bench_function("graph_build_1k", |b| b.iter(|| GraphBuilder::build(&index)));
}

fn bench_pagerank_100(c: &mut Criterion) {
    let index = MemoryIndex::from_documents(synthetic_corpus(100));
    let graph = GraphBuilder::build(&index);
    c.bench_function("pagerank_100", |b| {
        b.iter(|| compute(&graph, DEFAULT_ITERATIONS, DEFAULT_DAMPING))
    });
}

fn bench_pagerank_1k(c: &mut Criterion) {
    let index = MemoryIndex::from_documents(synthetic_corpus(1_000));
    let graph = GraphBuilder::build(&index);
    c.bench_function("pagerank_1k", |b| {
        b.iter(|| compute(&graph, DEFAULT_ITERATIONS, DEFAULT_DAMPING))
    });
}

criterion_group!(
    pagerank_benches,
    bench_graph_build_1k,
    bench_pagerank_100,
    bench_pagerank_1k
);
criterion_main!(pagerank_benches);
