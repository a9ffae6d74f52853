//! # Packing Benchmark
//!
//! Throughput of online packing at sprite-atlas workloads.
//!
//! Run with: `cargo bench --package cinder_atlas`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use cinder_atlas::OnlineTexturePacker;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Deterministic size sequence without pulling rand into the hot loop.
fn pseudo_size(i: u32) -> (u32, u32) {
    let x = i.wrapping_mul(2_654_435_761);
    (8 + (x >> 8) % 120, 8 + (x >> 20) % 120)
}

/// Benchmark: pack N mixed-size sprites into 2048-cap bins.
fn bench_pack_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_mixed");

    for count in [500_u32, 2_000, 8_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut packer = OnlineTexturePacker::new(2048, 2048);
                let mut area = 0_u64;
                for i in 0..count {
                    let (w, h) = pseudo_size(i);
                    if let Some(rect) = packer.pack(w, h) {
                        area += rect.area();
                    }
                }
                black_box(area)
            });
        });
    }

    group.finish();
}

/// Benchmark: uniform glyph-cache style packing (heavy exact-fit path).
fn bench_pack_uniform(c: &mut Criterion) {
    c.bench_function("pack_uniform_4k_glyphs", |b| {
        b.iter(|| {
            let mut packer = OnlineTexturePacker::new(1024, 1024);
            let mut bins = 0_usize;
            for _ in 0..4_000 {
                let rect = packer.pack(12, 16);
                bins = bins.max(rect.map_or(0, |r| r.bin as usize + 1));
            }
            black_box(bins)
        });
    });
}

criterion_group!(benches, bench_pack_mixed, bench_pack_uniform);
criterion_main!(benches);
