//! Validation throughput benchmarks
//!
//! Measures full graph validation for valid and invalid orders of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use modelcheck::prelude::*;
use modelcheck::{DefaultRegistry, Engine, NestingStrategy};
use modelcheck_bench::{order_instance, order_schema};

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_order");
    let registry = DefaultRegistry::with_builtins();
    let engine = Engine::new(&registry);
    let schema = order_schema();
    let options = ValidateOptions::new();

    for lines in [1usize, 10, 100] {
        let valid = order_instance(lines, true);
        group.bench_with_input(BenchmarkId::new("valid", lines), &valid, |b, instance| {
            b.iter(|| {
                engine
                    .validate(black_box(instance), &schema, &options)
                    .unwrap()
                    .into_ready()
                    .unwrap()
            })
        });

        let invalid = order_instance(lines, false);
        group.bench_with_input(BenchmarkId::new("invalid", lines), &invalid, |b, instance| {
            b.iter(|| {
                engine
                    .validate(black_box(instance), &schema, &options)
                    .unwrap()
                    .into_ready()
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_report_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_rendering");
    let report = validate(&order_instance(50, false), &order_schema(), false, &[])
        .unwrap()
        .into_ready()
        .unwrap()
        .unwrap();

    group.bench_function("nested_json", |b| {
        b.iter(|| black_box(&report).to_json(NestingStrategy::Nested))
    });

    group.bench_function("flattened_json", |b| {
        b.iter(|| black_box(&report).to_json(NestingStrategy::Flattened))
    });

    group.bench_function("display", |b| b.iter(|| black_box(&report).to_string()));

    group.finish();
}

criterion_group!(benches, bench_validate, bench_report_rendering);

criterion_main!(benches);
