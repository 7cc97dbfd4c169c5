use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::prelude::*;
use simnet::builder::{LinkMethod, SimilarityNetworkBuilder};
use simnet::core::{MetadataItem, SimilarityScores};
use simnet::tophits::{SearchBy, select_top_hits};
use smartcore::linalg::basic::arrays::Array2;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::hint::black_box;
use std::time::Duration;

/// Symmetric random scores with unit diagonal, as produced by an all-vs-all comparison
fn generate_scores(n: usize, seed: u64) -> SimilarityScores<MetadataItem> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut flat = vec![1.0f64; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let s: f64 = rng.random_range(0.0..1.0);
            flat[i * n + j] = s;
            flat[j * n + i] = s;
        }
    }
    let items: Vec<MetadataItem> = (0..n)
        .map(|i| MetadataItem::new().with("spectrumid", format!("spec_{i}")))
        .collect();
    let matrix = DenseMatrix::from_iterator(flat.into_iter(), n, n, 0);
    SimilarityScores::from_items(items, matrix).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    // Group 1: top-hit selection alone
    let mut group_hits = c.benchmark_group("select_top_hits");
    group_hits.warm_up_time(Duration::from_millis(300));
    group_hits.measurement_time(Duration::from_secs(3));
    group_hits.sample_size(20);

    for &n in &[100, 500, 1000] {
        let scores = generate_scores(n, 42);
        group_hits.bench_function(BenchmarkId::new("items", n), |b| {
            b.iter(|| {
                let hits =
                    select_top_hits(&scores, "spectrumid", 20, SearchBy::Queries, true).unwrap();
                black_box(hits);
            })
        });
    }
    group_hits.finish();

    // Group 2: full network construction, single vs mutual
    let mut group_net = c.benchmark_group("create_network");
    group_net.warm_up_time(Duration::from_millis(500));
    group_net.measurement_time(Duration::from_secs(3));
    group_net.sample_size(20);

    for &n in &[100, 500, 1000] {
        for method in [LinkMethod::Single, LinkMethod::Mutual] {
            let scores = generate_scores(n, 7);
            group_net.bench_function(BenchmarkId::new(method.to_string(), n), |b| {
                b.iter_batched(
                    || {
                        SimilarityNetworkBuilder::new(method)
                            .with_top_n(20)
                            .with_max_links(10)
                            .with_score_cutoff(0.7)
                            .build()
                            .unwrap()
                    },
                    |mut network| {
                        let edges = network.create_network(&scores).unwrap().edge_count();
                        black_box(edges);
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group_net.finish();

    // Group 3: top_n / max_links combinations on a fixed matrix
    let mut group_params = c.benchmark_group("create_network_param_combinations");
    group_params.warm_up_time(Duration::from_millis(300));
    group_params.measurement_time(Duration::from_secs(2));
    group_params.sample_size(15);

    let scores = generate_scores(500, 11);
    let combinations = [("narrow", 5, 3, 0.5), ("default", 20, 10, 0.7), ("wide", 50, 25, 0.3)];
    for (name, top_n, max_links, cutoff) in combinations {
        group_params.bench_function(BenchmarkId::new("combination", name), |b| {
            b.iter_batched(
                || {
                    SimilarityNetworkBuilder::new(LinkMethod::Mutual)
                        .with_top_n(top_n)
                        .with_max_links(max_links)
                        .with_score_cutoff(cutoff)
                        .build()
                        .unwrap()
                },
                |mut network| {
                    let edges = network.create_network(&scores).unwrap().edge_count();
                    black_box(edges);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group_params.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
