use crate::prelude::*;
use rand::{distributions::Uniform, Rng};

/* synthetic responses */
mod synthetic;
pub use synthetic::{regional_2d, synthetic_tipper};

/// Builds a [Tensor<2>] from its 4 components, row major
#[macro_export]
macro_rules! tensor2 {
    ($xx: expr, $xy: expr, $yx: expr, $yy: expr) => {
        Tensor::<2>::new($xx, $xy, $yx, $yy)
    };
}

/// Builds a [Complex64]
#[macro_export]
macro_rules! c64 {
    ($re: expr, $im: expr) => {
        Complex64::new($re, $im)
    };
}

/// `n` log spaced frequencies, from 10^`min_exp` to 10^`max_exp` Hz
pub fn log_frequencies(min_exp: f64, max_exp: f64, n: usize) -> Vec<f64> {
    let step = (max_exp - min_exp) / (n - 1) as f64;
    (0..n)
        .map(|i| 10.0_f64.powf(min_exp + step * i as f64))
        .collect()
}

/// Impedance with random (non null) complex values on all components,
/// 5% uncertainty
pub fn random_impedance(frequencies: &[f64]) -> Impedance {
    let mut rng = rand::thread_rng();
    let uniform = Uniform::new(0.5_f64, 10.0_f64);
    let mut values = Vec::with_capacity(frequencies.len());
    let mut errors = Vec::with_capacity(frequencies.len());
    for _ in frequencies {
        let mut z = Tensor::<2>::zeros();
        let mut err = ErrorTensor::<2>::zeros();
        for row in 0..2 {
            for col in 0..2 {
                let (re, im) = (rng.sample(uniform), rng.sample(uniform));
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                z[(row, col)] = Complex64::new(sign * re, im);
                err[(row, col)] = 0.05 * z[(row, col)].norm();
            }
        }
        values.push(z);
        errors.push(err);
    }
    Impedance::new(values, errors, frequencies.to_vec()).unwrap()
}

/// [random_impedance] with gaps: xx is missing at even indices,
/// yy is missing at index 1
pub fn gapped_impedance(frequencies: &[f64]) -> Impedance {
    let mut z = random_impedance(frequencies);
    for index in (0..frequencies.len()).step_by(2) {
        z.invalidate(index, 0, 0).unwrap();
    }
    if frequencies.len() > 1 {
        z.invalidate(1, 1, 1).unwrap();
    }
    z
}

/// Random angle in degrees, within [0, 360)
pub fn random_angle() -> f64 {
    rand::thread_rng().gen_range(0.0..360.0)
}

/// Multiplies each tensor by a real matrix on the left
pub fn left_multiply(z: &Impedance, left: &Matrix2<f64>) -> Impedance {
    let values = z
        .values()
        .iter()
        .map(|v| left.map(|x| Complex64::new(x, 0.0)) * v)
        .collect::<Vec<_>>();
    Impedance::with_mask(
        values,
        z.errors().to_vec(),
        z.mask().to_vec(),
        z.frequencies().to_vec(),
    )
    .unwrap()
}

/// Asserts both arrays share frequencies, validity, and
/// values & errors within given relative tolerance
pub fn assert_tensors_close<const R: usize>(
    found: &TensorArray<R>,
    expected: &TensorArray<R>,
    tolerance: f64,
) {
    compare_tensors(found, expected, tolerance, true)
}

/// Same as [assert_tensors_close], ignoring uncertainties.
/// Successive first order propagations do not compose,
/// so uncertainties are only comparable after identical operations.
pub fn assert_values_close<const R: usize>(
    found: &TensorArray<R>,
    expected: &TensorArray<R>,
    tolerance: f64,
) {
    compare_tensors(found, expected, tolerance, false)
}

fn compare_tensors<const R: usize>(
    found: &TensorArray<R>,
    expected: &TensorArray<R>,
    tolerance: f64,
    with_errors: bool,
) {
    assert_eq!(found.len(), expected.len(), "array length mismatch");
    assert_eq!(
        found.frequencies(),
        expected.frequencies(),
        "frequencies mismatch"
    );
    for index in 0..expected.len() {
        for row in 0..R {
            for col in 0..2 {
                match (found.entry(index, row, col), expected.entry(index, row, col)) {
                    (Some((z, err)), Some((z_ref, err_ref))) => {
                        let scale = z_ref.norm().max(1.0);
                        assert!(
                            (z - z_ref).norm() <= tolerance * scale,
                            "({}, {}, {}): found {}, expecting {}",
                            index,
                            row,
                            col,
                            z,
                            z_ref
                        );
                        assert!(
                            !with_errors
                                || (err - err_ref).abs() <= tolerance * err_ref.abs().max(1.0),
                            "({}, {}, {}): found error {}, expecting {}",
                            index,
                            row,
                            col,
                            err,
                            err_ref
                        );
                    },
                    (None, None) => {},
                    (found, expected) => panic!(
                        "({}, {}, {}): validity mismatch, found {:?}, expecting {:?}",
                        index, row, col, found, expected
                    ),
                }
            }
        }
    }
}

/// Compares raw values, regardless of validity.
/// Missing entries hold the zero sentinel.
pub fn assert_raw_values_close<const R: usize>(
    found: &TensorArray<R>,
    expected: &TensorArray<R>,
    tolerance: f64,
) {
    assert_eq!(found.len(), expected.len(), "array length mismatch");
    for (index, (z, z_ref)) in found.values().iter().zip(expected.values()).enumerate() {
        let scale = z_ref.map(|c| c.norm()).max().max(1.0);
        assert!(
            (z - z_ref).map(|c| c.norm()).max() <= tolerance * scale,
            "{}: found {}, expecting {}",
            index,
            z,
            z_ref
        );
    }
}

/// Asserts both real matrices are equal within given absolute tolerance
pub fn assert_matrix_close(found: &Matrix2<f64>, expected: &Matrix2<f64>, tolerance: f64) {
    assert!(
        (found - expected).abs().max() <= tolerance,
        "found {}, expecting {}",
        found,
        expected
    );
}
