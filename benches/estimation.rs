use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;

use tri_rs::estimation::{estimate_theta, estimate_theta_batch};
use tri_rs::simulation::simulate_responses;
use tri_rs::ItemParameters;

fn bench_single(c: &mut Criterion) {
    let items = ItemParameters::synthetic(180, 42);
    let responses = simulate_responses(0.5, &items, 7);

    c.bench_function("estimate_theta/180_items", |b| {
        b.iter(|| {
            estimate_theta(
                black_box(&responses),
                black_box(&items.a),
                black_box(&items.b),
                black_box(&items.c),
            )
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let items = ItemParameters::synthetic(45, 42);
    let n_persons = 1_000;
    let mut matrix = Array2::<i32>::zeros((n_persons, items.len()));
    for i in 0..n_persons {
        let theta = -2.0 + 4.0 * i as f64 / n_persons as f64;
        let row = simulate_responses(theta, &items, i as u64);
        for (j, r) in row.into_iter().enumerate() {
            matrix[[i, j]] = r;
        }
    }

    c.bench_function("estimate_theta_batch/1000x45", |b| {
        b.iter(|| estimate_theta_batch(black_box(matrix.view()), &items.a, &items.b, &items.c))
    });
}

criterion_group!(benches, bench_single, bench_batch);
criterion_main!(benches);
