//! Benchmarking frequency interpolation
//! over a typical broadband sounding
extern crate criterion;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use magnetotelluric::prelude::*;

fn log_frequencies(min_exp: f64, max_exp: f64, n: usize) -> Vec<f64> {
    let step = (max_exp - min_exp) / (n - 1) as f64;
    (0..n)
        .map(|i| 10.0_f64.powf(min_exp + step * i as f64))
        .collect()
}

fn sounding(frequencies: &[f64]) -> (Impedance, Tipper) {
    let mut values = Vec::with_capacity(frequencies.len());
    let mut tipper = Vec::with_capacity(frequencies.len());
    for f in frequencies {
        let x = f.log10();
        let zxy = Complex64::from_polar((100.0 * f / 0.2).sqrt(), (60.0 + 5.0 * x.sin()).to_radians());
        let zyx = -Complex64::from_polar((10.0 * f / 0.2).sqrt(), (30.0 + 5.0 * x.cos()).to_radians());
        let diag = 0.05 * zxy;
        values.push(Tensor::<2>::new(diag, zxy, zyx, -diag));
        tipper.push(Tensor::<1>::new(
            Complex64::new(0.2, 0.1 * x.cos()),
            Complex64::new(-0.1, 0.05),
        ));
    }
    let errors = values.iter().map(|z| z.map(|c| 0.05 * c.norm())).collect();
    let z = Impedance::new(values, errors, frequencies.to_vec()).unwrap();
    let t = Tipper::new(
        tipper,
        vec![ErrorTensor::<1>::from_element(0.02); frequencies.len()],
        frequencies.to_vec(),
    )
    .unwrap();
    (z, t)
}

fn benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolation");

    let (z, t) = sounding(&log_frequencies(-4.0, 4.0, 80));
    let targets = log_frequencies(-3.5, 3.5, 43);

    for kind in [
        InterpolationKind::Linear,
        InterpolationKind::Nearest,
        InterpolationKind::Cubic,
    ] {
        let opts = InterpolationOptions::default().with_kind(kind);
        group.bench_function(&format!("{}", kind), |b| {
            b.iter(|| {
                let _ = interpolate(black_box(&z), black_box(&t), &targets, &opts).unwrap();
            })
        });
    }

    let opts = InterpolationOptions::default().with_period_buffer(2.0);
    group.bench_function("slinear/buffered", |b| {
        b.iter(|| {
            let _ = interpolate(black_box(&z), black_box(&t), &targets, &opts).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
