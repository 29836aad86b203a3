//! Serialization adapter benchmarks.

use campus_bench::populated_registry;
use campus_codec::Workbook;
use campus_core::{blob, report, rows};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SIZES: [usize; 3] = [100, 1000, 5000];

/// Benchmark the local JSON blob.
fn bench_blob(c: &mut Criterion) {
    let mut group = c.benchmark_group("blob");

    for students in SIZES.iter() {
        let registry = populated_registry(*students, 20, 60);
        let text = blob::encode(&registry).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", students), &registry, |b, registry| {
            b.iter(|| black_box(blob::encode(registry).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("decode", students), &text, |b, text| {
            b.iter(|| black_box(blob::decode_registry(text)));
        });
    }
    group.finish();
}

/// Benchmark the workbook document.
fn bench_workbook(c: &mut Criterion) {
    let mut group = c.benchmark_group("workbook");

    for students in SIZES.iter() {
        let registry = populated_registry(*students, 20, 60);
        let bytes = rows::to_workbook(&registry).to_bytes().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("export", students), &registry, |b, registry| {
            b.iter(|| black_box(rows::to_workbook(registry).to_bytes().unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("import", students), &bytes, |b, bytes| {
            b.iter(|| {
                let workbook = Workbook::from_bytes(black_box(bytes)).unwrap();
                let mut registry = campus_core::Registry::new();
                rows::import_workbook(&mut registry, &workbook).unwrap();
                black_box(registry);
            });
        });
    }
    group.finish();
}

/// Benchmark the flat text report.
fn bench_report(c: &mut Criterion) {
    let registry = populated_registry(1000, 20, 60);
    c.bench_function("report_1000", |b| {
        b.iter(|| black_box(report::to_delimited_text(black_box(&registry))));
    });
}

criterion_group!(benches, bench_blob, bench_workbook, bench_report);
criterion_main!(benches);
