//! Criterion microbenches for hyperplane predicates.
//!
//! - distance: dimension-specialized path vs the reference loop, d = 2..=9.
//! - equals: shared storage vs distinct copies.
//!
//! Results live under `target/criterion`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use facetkit::{Hyperplane, NumericContext, Point};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_vec(rng: &mut StdRng, d: usize) -> Vec<f64> {
    (0..d).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn bench_distance(c: &mut Criterion) {
    let ctx = NumericContext::default();
    let mut rng = StdRng::seed_from_u64(42);
    let mut group = c.benchmark_group("distance");
    for d in 2..=9 {
        let normal = random_vec(&mut rng, d);
        let x = random_vec(&mut rng, d);
        let h = Hyperplane::new(&ctx, &normal, 0.25);
        let p = Point::new(&x);
        group.bench_with_input(BenchmarkId::new("unrolled", d), &d, |b, _| {
            b.iter(|| black_box(h.distance(black_box(&p))))
        });
        group.bench_with_input(BenchmarkId::new("generic", d), &d, |b, _| {
            b.iter(|| black_box(h.distance_generic(black_box(&p))))
        });
    }
    group.finish();
}

fn bench_equals(c: &mut Criterion) {
    let ctx = NumericContext::default();
    let mut rng = StdRng::seed_from_u64(7);
    let normal = random_vec(&mut rng, 6);
    let copy = normal.clone();
    let a = Hyperplane::new(&ctx, &normal, 1.0);
    let b_shared = Hyperplane::new(&ctx, &normal, 1.0);
    let b_copy = Hyperplane::new(&ctx, &copy, 1.0);
    let mut group = c.benchmark_group("equals");
    group.bench_function("shared", |b| b.iter(|| black_box(a.equals(black_box(&b_shared)))));
    group.bench_function("copy", |b| b.iter(|| black_box(a.equals(black_box(&b_copy)))));
    group.finish();
}

criterion_group!(benches, bench_distance, bench_equals);
criterion_main!(benches);
