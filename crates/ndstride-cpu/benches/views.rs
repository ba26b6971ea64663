//! Benchmarks for views versus copies
//!
//! Slicing and transposing only build a new layout over the shared buffer;
//! these groups measure that against materializing the same selection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndstride_core::{
    ops::{IndexOps, ManipulationOps, StatsOps},
    Array, Idx,
};
use ndstride_cpu::{CpuArray, CpuBackend};

/// Generate a random float64 array of given shape
fn random_array(shape: &[usize]) -> CpuArray {
    use rand::Rng;
    let len: usize = shape.iter().product();
    let mut rng = rand::rng();
    let data: Vec<f64> = (0..len).map(|_| rng.random::<f64>()).collect();
    CpuArray::from_f64_vec(data, shape.to_vec()).unwrap()
}

fn bench_slice_view_vs_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice_view_vs_copy");

    for size in [100usize, 500, 1000].iter() {
        let arr = random_array(&[*size, *size]);
        let index = [Idx::step(2), Idx::range(1, (*size - 1) as isize)];

        group.bench_with_input(BenchmarkId::new("view", size), &arr, |bench, arr| {
            bench.iter(|| black_box(CpuBackend::slice(arr, &index).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("copy", size), &arr, |bench, arr| {
            bench.iter(|| {
                let view = CpuBackend::slice(arr, &index).unwrap();
                black_box(CpuBackend::copy(&view))
            });
        });
    }

    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");

    for size in [100usize, 500, 1000].iter() {
        let arr = random_array(&[*size, *size]);

        group.bench_with_input(BenchmarkId::new("view", size), &arr, |bench, arr| {
            bench.iter(|| black_box(CpuBackend::transpose(arr, None).unwrap()));
        });

        // Reshaping a transposed view forces a gather
        group.bench_with_input(
            BenchmarkId::new("reshape_copy", size),
            &arr,
            |bench, arr| {
                bench.iter(|| {
                    let t = CpuBackend::transpose(arr, None).unwrap();
                    black_box(CpuBackend::reshape(&t, vec![arr.size()]).unwrap())
                });
            },
        );
    }

    group.finish();
}

fn bench_reduce_strided(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_strided");

    let size = 1000;
    let arr = random_array(&[size, size]);
    let transposed = CpuBackend::transpose(&arr, None).unwrap();
    let packed = CpuBackend::copy(&transposed);

    group.bench_function("sum_contiguous", |bench| {
        bench.iter(|| black_box(CpuBackend::sum(&packed).unwrap()));
    });

    group.bench_function("sum_transposed_view", |bench| {
        bench.iter(|| black_box(CpuBackend::sum(&transposed).unwrap()));
    });

    group.bench_function("sum_axis_view", |bench| {
        bench.iter(|| black_box(CpuBackend::sum_axis(&transposed, 0).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_slice_view_vs_copy,
    bench_transpose,
    bench_reduce_strided
);
criterion_main!(benches);
