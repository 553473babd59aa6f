//! Benchmark for the temporal motif counter.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chronograph_graph::ImpulseDiGraph;
use chronograph_motifs::{count_temporal_motifs, Motif};

fn ring_graph(nodes: i64, events_per_edge: i64) -> ImpulseDiGraph<i64, i64> {
    let mut g = ImpulseDiGraph::new();
    let mut t = 0;
    for round in 0..events_per_edge {
        for n in 0..nodes {
            g.add_edge(n, (n + 1) % nodes, t + round);
            t += 2;
        }
    }
    g
}

fn bench_motif_count(c: &mut Criterion) {
    let graph = ring_graph(60, 4);
    let triangle = Motif::new(vec![(1, 2), (2, 3), (3, 1)]).expect("connected motif");
    let chain = Motif::new(vec![(1, 2), (2, 3)]).expect("connected motif");

    let mut group = c.benchmark_group("motif_count");
    group.sample_size(20);

    group.bench_function("chain_on_ring", |b| {
        b.iter(|| black_box(count_temporal_motifs(&graph, &chain, 40)).total());
    });
    group.bench_function("triangle_on_ring", |b| {
        b.iter(|| black_box(count_temporal_motifs(&graph, &triangle, 40)).total());
    });

    group.finish();
}

criterion_group!(benches, bench_motif_count);
criterion_main!(benches);
