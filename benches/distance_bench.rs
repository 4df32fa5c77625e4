use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use vecluster::distance::{nearest, scalar};

fn random_vector(rng: &mut ChaCha8Rng, dim: usize) -> Vec<f32> {
    (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn bench_l2_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("l2_squared");
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    for dim in [128, 256, 512, 768, 1024, 1536, 2048].iter() {
        let a = random_vector(&mut rng, *dim);
        let b = random_vector(&mut rng, *dim);
        let b64: Vec<f64> = b.iter().map(|&x| x as f64).collect();

        group.throughput(Throughput::Bytes((*dim * 4 * 2) as u64)); // 2 vectors, f32 = 4 bytes

        group.bench_with_input(BenchmarkId::new("f32_f32", dim), dim, |bencher, _| {
            bencher.iter(|| scalar::l2_squared_scalar(black_box(&a), black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("f32_f64", dim), dim, |bencher, _| {
            bencher.iter(|| scalar::l2_squared_scalar(black_box(&a), black_box(&b64)))
        });
    }

    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_centroid");
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let dim = 1024;
    let query = random_vector(&mut rng, dim);

    for k in [2, 10, 100].iter() {
        let centroids: Vec<Vec<f64>> = (0..*k)
            .map(|_| random_vector(&mut rng, dim).into_iter().map(f64::from).collect())
            .collect();

        group.throughput(Throughput::Elements(*k as u64));

        group.bench_with_input(BenchmarkId::from_parameter(k), k, |bencher, _| {
            bencher.iter(|| nearest(black_box(&query), black_box(&centroids)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_l2_distance, bench_nearest);
criterion_main!(benches);
