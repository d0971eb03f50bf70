use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use noosphere::{Contract, IdeaStore, MemeStore};
use serde_json::json;

fn benchmark_idea_lookup(c: &mut Criterion) {
    let mut store = IdeaStore::new();
    for i in 0..100u64 {
        store.create_idea(format!("idea {}", i), i, 1);
    }

    c.bench_function("idea lookup", |b| {
        b.iter(|| store.calculate_evolution_score(50));
    });
}

fn benchmark_meme_reinforcement(c: &mut Criterion) {
    let mut store = MemeStore::new();
    let id = store.create_meme("hot meme", 1);

    c.bench_function("meme reinforcement", |b| {
        b.iter(|| store.reinforce_meme(id));
    });
}

fn benchmark_envelope_dispatch(c: &mut Criterion) {
    let mut store = MemeStore::new();
    store.create_meme("dispatched", 1);
    let args = [json!(1)];

    c.bench_function("envelope get-meme", |b| {
        b.iter(|| store.call("get-meme", &args));
    });
}

fn benchmark_snapshot_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_sizes");

    for size in [10u64, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut store = IdeaStore::new();
            for i in 0..size {
                store.create_idea(format!("idea {}", i), i, i);
            }

            b.iter(|| store.snapshot());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_idea_lookup,
    benchmark_meme_reinforcement,
    benchmark_envelope_dispatch,
    benchmark_snapshot_sizes
);
criterion_main!(benches);
