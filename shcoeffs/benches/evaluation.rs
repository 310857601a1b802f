use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shcoeffs::{cilm_to_vector, legendre, Component, EvalOptions, GridEvaluator, ShCoeffs};
use tempfile::NamedTempFile;

/// Create a synthetic model with a smoothly decaying spectrum.
fn create_coeffs(lmax: usize) -> ShCoeffs {
    let mut coeffs = ShCoeffs::zeros(lmax);
    coeffs.set(Component::Cosine, 0, 0, 3396000.0);
    for l in 1..=lmax {
        let amplitude = 1000.0 / (l * l) as f64;
        for m in 0..=l {
            coeffs.set(Component::Cosine, l, m, amplitude * ((l + m) % 7) as f64);
            if m > 0 {
                coeffs.set(Component::Sine, l, m, -amplitude * ((l * m) % 5) as f64);
            }
        }
    }
    coeffs
}

/// Write `coeffs` in the text format read by `ShReader`.
fn create_file(coeffs: &ShCoeffs) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for l in 0..=coeffs.lmax() {
        for m in 0..=l {
            writeln!(file, "{} {} {:e} {:e}", l, m, coeffs.cos(l, m), coeffs.sin(l, m)).unwrap();
        }
    }
    file
}

fn bench_read(c: &mut Criterion) {
    let file = create_file(&create_coeffs(719));

    c.bench_function("read_degree_719", |b| {
        b.iter(|| black_box(shcoeffs::read(black_box(file.path()), 719).unwrap()));
    });
}

fn bench_legendre(c: &mut Criterion) {
    let table = legendre::LegendreTable::new(719, legendre::Normalization::FourPi).unwrap();
    let mut out = Vec::new();

    c.bench_function("legendre_degree_719", |b| {
        b.iter(|| {
            table
                .compute_into(black_box(0.1736), legendre::CsPhase::Exclude, &mut out)
                .unwrap();
            black_box(&out);
        });
    });
}

fn bench_point(c: &mut Criterion) {
    let coeffs = create_coeffs(719);
    let low = GridEvaluator::new(&coeffs, 15, EvalOptions::default()).unwrap();
    let high = GridEvaluator::new(&coeffs, 719, EvalOptions::default()).unwrap();

    c.bench_function("point_degree_15", |b| {
        b.iter(|| black_box(low.evaluate(black_box(10.0), black_box(30.0)).unwrap()));
    });
    c.bench_function("point_degree_719", |b| {
        b.iter(|| black_box(high.evaluate(black_box(10.0), black_box(30.0)).unwrap()));
    });
}

fn bench_grid(c: &mut Criterion) {
    let coeffs = create_coeffs(90);
    let evaluator = GridEvaluator::new(&coeffs, 90, EvalOptions::default()).unwrap();

    c.bench_function("grid_degree_90", |b| {
        b.iter(|| black_box(evaluator.make_grid(evaluator.default_nlat()).unwrap()));
    });
}

fn bench_vector(c: &mut Criterion) {
    let coeffs = create_coeffs(719);

    c.bench_function("cilm_to_vector_719", |b| {
        b.iter(|| black_box(cilm_to_vector(black_box(&coeffs), 719).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_read,
    bench_legendre,
    bench_point,
    bench_grid,
    bench_vector,
);
criterion_main!(benches);
