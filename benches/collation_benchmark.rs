use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use ltrimzero::prelude::*;
use rand::Rng;
use std::hint::black_box;

fn padded_identifiers(count: usize) -> Vec<Vec<u8>> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let pad = rng.random_range(0..12);
            let body = rng.random_range(1..20);
            let mut value = vec![if rng.random_bool(0.5) { b'0' } else { b' ' }; pad];
            value.extend((0..body).map(|_| rng.random_range(b'0'..=b'z')));
            value
        })
        .collect()
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compare");

    let values = padded_identifiers(10_000);
    let total_bytes: usize = values.iter().map(|v| v.len()).sum();
    group.throughput(Throughput::Bytes(total_bytes as u64));

    group.bench_function("ltrimzero::compare", |b| {
        b.iter(|| {
            values
                .windows(2)
                .filter(|pair| compare(black_box(&pair[0]), black_box(&pair[1])).is_ok())
                .count()
        })
    });

    // Baseline: plain byte-wise comparison without normalization.
    group.bench_function("slice::cmp", |b| {
        b.iter(|| {
            values
                .windows(2)
                .filter(|pair| black_box(&pair[0]).cmp(black_box(&pair[1])).is_lt())
                .count()
        })
    });

    group.finish();
}

fn bench_encode_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sort Key");

    let values = padded_identifiers(10_000);
    let width = values
        .iter()
        .map(|v| max_key_length(v.len()))
        .max()
        .unwrap_or(0);
    let mut key = vec![0u8; width];

    group.bench_function("encode_key (fixed width)", |b| {
        b.iter(|| {
            for value in &values {
                black_box(encode_key(black_box(value), &mut key).ok());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_compare, bench_encode_key);
criterion_main!(benches);
