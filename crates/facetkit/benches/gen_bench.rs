//! Criterion microbenches for point generation through the built-in engine.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use facetkit::PointGenerator;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for cmd in ["1000 D3", "1000 s D3", "1000 D8 t5", "0 c D10"] {
        group.bench_function(BenchmarkId::new("append_points", cmd), |b| {
            b.iter_batched(
                PointGenerator::new,
                |mut pg| {
                    let _ = pg.append_points(cmd);
                    pg
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.bench_function("accumulate_10x100", |b| {
        b.iter_batched(
            PointGenerator::new,
            |mut pg| {
                for seed in 0..10 {
                    let _ = pg.append_points(&format!("100 D4 t{seed}"));
                }
                pg
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
