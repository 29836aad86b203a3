//! Local store benchmarks.

use campus_bench::populated_registry;
use campus_core::blob;
use campus_storage::{FileStore, InMemoryStore, LocalStore};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tempfile::TempDir;

const KEY: &str = "uniManageData";

/// Benchmark saving and loading the blob in each store.
fn bench_stores(c: &mut Criterion) {
    let text = blob::encode(&populated_registry(1000, 20, 60)).unwrap();
    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("memory_put", |b| {
        let mut store = InMemoryStore::new();
        b.iter(|| store.put(KEY, black_box(&text)).unwrap());
    });

    let dir = TempDir::new().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    group.bench_function("file_put_flush", |b| {
        b.iter(|| {
            store.put(KEY, black_box(&text)).unwrap();
            store.flush().unwrap();
        });
    });
    group.bench_function("file_get", |b| {
        b.iter(|| black_box(store.get(KEY).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_stores);
criterion_main!(benches);
