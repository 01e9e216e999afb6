//! Path resolution benchmarks
//!
//! Benchmarks tokenizing and resolving sibling, nested and parent paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use modelcheck::{tokenize, PathAccessor, Scope};
use modelcheck_bench::order_instance;

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_tokenize");

    group.bench_function("single_key", |b| b.iter(|| tokenize(black_box("reference"))));

    group.bench_function("mixed_separators", |b| {
        b.iter(|| tokenize(black_box("../../settings/limits.max")))
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolve");
    let order = order_instance(10, true);
    let root = Scope::root(&order);
    let lines = order.get("lines").and_then(|l| l.as_items()).unwrap();
    let line = root.child(&lines[5]);

    group.bench_function("sibling", |b| {
        let accessor = PathAccessor::new(&root);
        b.iter(|| accessor.resolve(black_box("maxQuantity")).unwrap())
    });

    group.bench_function("nested_index", |b| {
        let accessor = PathAccessor::new(&root);
        b.iter(|| accessor.resolve(black_box("lines/9/sku")).unwrap())
    });

    group.bench_function("parent_hop", |b| {
        let accessor = PathAccessor::new(&line);
        b.iter(|| accessor.resolve(black_box("../customer.email")).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_resolve);

criterion_main!(benches);
