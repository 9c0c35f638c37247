//! LRU cache benchmarks: insertion, hit and miss lookups, and eviction
//! churn at several payload sizes.
//!
//! Run with: cargo bench --bench lru_cache

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use iconmark::{CachedResource, LruCache};

const SIZE_1KB: usize = 1024;
const SIZE_10KB: usize = 10 * 1024;
const SIZE_100KB: usize = 100 * 1024;

/// Generate payload bytes with non-trivial content.
fn generate_payload(size: usize) -> Vec<u8> {
    let pattern: Vec<u8> = (0..256).map(|i| i as u8).collect();
    pattern.iter().cycle().take(size).cloned().collect()
}

fn populated_cache(capacity: usize, entries: usize, payload: usize) -> LruCache<CachedResource> {
    let cache = LruCache::new(capacity);
    for i in 0..entries {
        cache.put(
            format!("svg:{:06}", i),
            CachedResource::Svg(generate_payload(payload)),
        );
    }
    cache
}

fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_put");
    for &size in &[SIZE_1KB, SIZE_10KB, SIZE_100KB] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let cache: LruCache<CachedResource> = LruCache::new(1024);
            let payload = generate_payload(size);
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                cache.put(
                    format!("svg:{:06}", i % 512),
                    CachedResource::Svg(payload.clone()),
                );
            });
        });
    }
    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_get_hit");
    for &size in &[SIZE_1KB, SIZE_10KB, SIZE_100KB] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let cache = populated_cache(256, 256, size);
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                black_box(cache.get(&format!("svg:{:06}", i % 256)));
            });
        });
    }
    group.finish();
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("lru_get_miss", |b| {
        let cache = populated_cache(256, 256, SIZE_1KB);
        b.iter(|| black_box(cache.get("svg:missing")));
    });
}

fn bench_eviction_churn(c: &mut Criterion) {
    // Every insert past capacity evicts the tail entry.
    c.bench_function("lru_eviction_churn", |b| {
        let cache = populated_cache(64, 64, SIZE_1KB);
        let payload = generate_payload(SIZE_1KB);
        let mut i = 1_000_000u64;
        b.iter(|| {
            i += 1;
            cache.put(format!("svg:{:06}", i), CachedResource::Svg(payload.clone()));
        });
    });
}

criterion_group!(
    benches,
    bench_put,
    bench_get_hit,
    bench_get_miss,
    bench_eviction_churn
);
criterion_main!(benches);
