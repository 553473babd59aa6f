//! Benchmarks for the temporal edge indexes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chronograph_core::{EdgeId, Inclusive, IntervalTree, TimestampIndex};

fn build_tree(n: u64) -> IntervalTree<i64> {
    let mut tree = IntervalTree::new();
    for i in 0..n {
        let low = (i * 37 % 10_000) as i64;
        let dur = (i % 50 + 1) as i64;
        tree.insert(low, low + dur, EdgeId(i)).expect("valid interval");
    }
    tree
}

fn bench_interval_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_tree");

    group.bench_function("insert_10k", |b| {
        b.iter(|| build_tree(black_box(10_000)));
    });

    let tree = build_tree(10_000);
    group.bench_function("overlap_query", |b| {
        b.iter(|| {
            let hits: usize = tree.query(Some(2_000), Some(2_500)).count();
            black_box(hits)
        });
    });

    group.finish();
}

fn bench_timestamp_index(c: &mut Criterion) {
    let mut idx = TimestampIndex::new();
    for i in 0..10_000u64 {
        idx.insert((i % 2_000) as i64, EdgeId(i));
    }

    c.bench_function("timestamp_range", |b| {
        b.iter(|| {
            let hits: usize = idx
                .range(Some(500), Some(800), Inclusive::Left)
                .count();
            black_box(hits)
        });
    });
}

criterion_group!(benches, bench_interval_tree, bench_timestamp_index);
criterion_main!(benches);
