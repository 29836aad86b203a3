//! Record store benchmarks.

use campus_bench::{populated_registry, random_course_id, random_student};
use campus_core::{views, EntityKind, StudentPatch};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Benchmark adding a student with cross-reference repair.
fn bench_add_student(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_student");

    for courses in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(courses), courses, |b, &courses| {
            let base = populated_registry(100, 10, courses);
            let student = random_student(&base, "NEW00001", 5);
            b.iter_batched(
                || base.clone(),
                |mut registry| {
                    registry.add_student(black_box(student.clone())).unwrap();
                    registry
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// Benchmark replacing a student's course list.
fn bench_update_courses(c: &mut Criterion) {
    let base = populated_registry(500, 20, 60);
    let courses: Vec<String> = base.courses().iter().take(6).map(|c| c.id.clone()).collect();

    c.bench_function("update_student_courses", |b| {
        b.iter_batched(
            || base.clone(),
            |mut registry| {
                registry
                    .update_student("S00001", StudentPatch::new().courses(courses.clone()))
                    .unwrap();
                registry
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

/// Benchmark cascading course deletes.
fn bench_delete_course(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_course");

    for students in [100, 1000, 5000].iter() {
        group.throughput(Throughput::Elements(*students as u64));
        group.bench_with_input(BenchmarkId::from_parameter(students), students, |b, &students| {
            let base = populated_registry(students, 20, 60);
            let course = random_course_id(&base).unwrap();
            b.iter_batched(
                || base.clone(),
                |mut registry| {
                    let impact = registry.delete(EntityKind::Course, black_box(&course)).unwrap();
                    black_box(impact);
                    registry
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// Benchmark delete previews, which do not mutate.
fn bench_preview_delete(c: &mut Criterion) {
    let registry = populated_registry(2000, 20, 60);
    let course = random_course_id(&registry).unwrap();

    c.bench_function("preview_delete_course", |b| {
        b.iter(|| {
            let impact = registry.preview_delete(EntityKind::Course, black_box(&course)).unwrap();
            black_box(impact);
        });
    });
}

/// Benchmark derived views.
fn bench_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("views");

    for students in [100, 1000, 10000].iter() {
        let registry = populated_registry(*students, 20, 60);
        group.throughput(Throughput::Elements(*students as u64));

        group.bench_with_input(BenchmarkId::new("top_students", students), &registry, |b, registry| {
            b.iter(|| black_box(views::top_students(registry.students(), 5)));
        });
        group.bench_with_input(BenchmarkId::new("summary", students), &registry, |b, registry| {
            b.iter(|| black_box(views::summary(registry)));
        });
        group.bench_with_input(BenchmarkId::new("check_integrity", students), &registry, |b, registry| {
            b.iter(|| black_box(registry.check_integrity()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_add_student,
    bench_update_courses,
    bench_delete_course,
    bench_preview_delete,
    bench_views,
);

criterion_main!(benches);
