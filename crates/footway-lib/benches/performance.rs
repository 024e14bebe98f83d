//! Performance benchmarks for footway-lib
//!
//! Run with: cargo bench --package footway-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use footway_lib::{
    BoundingBox, Config, LatLon, SegmentCache, SegmentDisplay, SegmentShape, WayId, WayLoader,
    WayRecord, WayTags, classify, compute_deltas,
};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Display that drops every instruction
struct NullDisplay;

impl SegmentDisplay for NullDisplay {
    fn attach(&mut self, _shape: &Arc<SegmentShape>, _style: footway_lib::Style) {}
    fn detach(&mut self, _id: &WayId) {}
    fn set_style(&mut self, _id: &WayId, _style: footway_lib::Style) {}
    fn bring_to_front(&mut self, _id: &WayId) {}
}

const SURFACES: [&str; 6] = ["asphalt", "concrete", "wood", "gravel", "paved", "lava"];

/// Generate a response worth of footways, ids starting at `first`
fn generate_ways(first: u64, count: u64) -> BTreeMap<WayId, WayRecord> {
    (first..first + count)
        .map(|i| {
            let lat = 55.75 + (i % 100) as f64 * 1e-4;
            let lon = 37.61 + (i / 100) as f64 * 1e-4;
            let mut tags = WayTags::default();
            tags.insert("surface", SURFACES[i as usize % SURFACES.len()]);
            if i % 7 == 0 {
                tags.insert("incline", "-15%");
            }
            let record = WayRecord {
                id: None,
                nodes: (0..8)
                    .map(|k| LatLon::new(lat + k as f64 * 1e-5, lon + k as f64 * 1e-5))
                    .collect(),
                tags,
            };
            (WayId::from(i), record)
        })
        .collect()
}

// ============================================================================
// Core Benchmarks
// ============================================================================

fn bench_cache_bursts(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");

    for capacity in [1_000usize, 6_000] {
        let inserts = capacity as u64 * 3;
        group.throughput(Throughput::Elements(inserts));
        group.bench_with_input(
            BenchmarkId::new("insert_overflowing", capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let mut cache =
                        SegmentCache::new(NonZeroUsize::new(capacity).unwrap(), 0.9).unwrap();
                    let mut evicted = 0usize;
                    for key in 0..inserts {
                        evicted += cache.insert(key, key, |_, _| {});
                    }
                    evicted
                });
            },
        );
    }

    group.finish();
}

fn bench_render_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("loader");
    group.sample_size(20);

    // A pan that brings 500 new ways into a warm cache of the default size
    let warm = generate_ways(0, 6_000);
    let fresh = generate_ways(6_000, 500);

    group.throughput(Throughput::Elements(500));
    group.bench_function("render_500_into_full_cache", |b| {
        b.iter_batched(
            || {
                let mut loader = WayLoader::new(Config::default(), NullDisplay).unwrap();
                loader.render_ways(warm.clone());
                loader
            },
            |mut loader| loader.render_ways(fresh.clone()),
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_deltas(c: &mut Criterion) {
    let mut group = c.benchmark_group("deltas");

    let prev = BoundingBox::new(37.60, 55.74, 37.62, 55.75);
    let panned = BoundingBox::new(37.605, 55.745, 37.625, 55.755);
    let zoomed_out = BoundingBox::new(37.59, 55.73, 37.63, 55.76);

    group.bench_function("diagonal_pan", |b| {
        b.iter(|| compute_deltas(&panned, Some(&prev)));
    });
    group.bench_function("zoom_out", |b| {
        b.iter(|| compute_deltas(&zoomed_out, Some(&prev)));
    });

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    group.bench_function("surface_fallback", |b| {
        b.iter(|| {
            SURFACES
                .iter()
                .map(|surface| classify(Some("unknown"), Some(surface)))
                .count()
        });
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_cache_bursts,
    bench_render_cycle,
    bench_deltas,
    bench_classify,
);

criterion_main!(benches);
