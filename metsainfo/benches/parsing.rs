//! Benchmarks for detail-page parsing

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const STAND_FULL: &str = include_str!("../tests/fixtures/stand_full.html");
const STAND_SHORT: &str = include_str!("../tests/fixtures/stand_short.html");
const NOTIFICATION: &str = include_str!("../tests/fixtures/notification.html");

fn bench_parse_stand(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_stand");

    group.throughput(Throughput::Bytes(STAND_FULL.len() as u64));
    group.bench_function("full", |b| {
        b.iter(|| metsainfo::parse_stand(black_box(STAND_FULL)).unwrap())
    });

    group.throughput(Throughput::Bytes(STAND_SHORT.len() as u64));
    group.bench_function("short", |b| {
        b.iter(|| metsainfo::parse_stand(black_box(STAND_SHORT)).unwrap())
    });

    group.finish();
}

fn bench_parse_notification(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_notification");
    group.throughput(Throughput::Bytes(NOTIFICATION.len() as u64));
    group.bench_function("notification", |b| {
        b.iter(|| metsainfo::parse_notification(black_box(NOTIFICATION)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_parse_stand, bench_parse_notification);
criterion_main!(benches);
