use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gauss_max::{max_of_gaussians, Gaussian};

fn ensemble(n: usize) -> Vec<Gaussian> {
    let pairs: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let x = i as f64;
            (0.6 + 0.01 * (x * 0.7).sin(), 0.015 + 0.02 * ((x * 1.3).cos() + 1.0) / 2.0)
        })
        .collect();
    Gaussian::from_pairs(&pairs).expect("valid ensemble")
}

fn bench_exact(c: &mut Criterion) {
    let pair = Gaussian::from_pairs(&[(1.0, 1.0), (0.75, 0.25)]).expect("valid pair");
    c.bench_function("max_of_gaussians/exact_pair", |b| {
        b.iter(|| max_of_gaussians(black_box(&pair), 1e-6).expect("exact"))
    });
}

fn bench_quadrature(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_of_gaussians/quadrature");
    for &n in &[3_usize, 10, 50] {
        let list = ensemble(n);
        for &epsilon in &[1e-3, 1e-6, 1e-9] {
            let id = BenchmarkId::new(format!("n{n}"), format!("{epsilon:e}"));
            group.bench_with_input(id, &list, |b, list| {
                b.iter(|| max_of_gaussians(black_box(list), epsilon).expect("converges"))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_exact, bench_quadrature);
criterion_main!(benches);
