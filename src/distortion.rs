//! Galvanic distortion estimation & removal.
//!
//! Observed impedance relates to the regional impedance through a real,
//! frequency independent matrix: Z = D Z0 (Bibby et al., 2005).
//! Rotated into the regional strike, Z0 is anti diagonal, hence each column
//! of the observed tensor is a complex scalar times a fixed real vector:
//! that vector is a column of D, up to its norm.
use itertools::Itertools;
use nalgebra::{Matrix2, SymmetricEigen, Vector2};

use crate::{
    constants::Distortion as Constants,
    error::Error,
    phase_tensor::PhaseTensor,
    rotation::{rotation_matrix, Rotate},
    tensor::Impedance,
};

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Estimated distortion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Distortion {
    /// Distortion matrix D, expressed in the frame of the input impedance.
    /// Its columns have unit norm in the regional strike frame:
    /// site gain and anisotropy are not resolvable.
    matrix: Matrix2<f64>,
    /// 1 sigma uncertainty of D
    error: Matrix2<f64>,
    /// Regional strike [deg], modulo 90°
    strike: f64,
    /// Number of samples the fit relied on
    samples: usize,
}

/// Direction of one impedance column, fitted over all selected
/// samples (real & imaginary parts), with its uncertainty.
fn fit_direction(z: &Impedance, indices: &[usize], col: usize) -> Result<(Vector2<f64>, Vector2<f64>), Error> {
    let mut scatter = Matrix2::<f64>::zeros();
    for index in indices {
        let value = match z.value(*index) {
            Some(value) => value,
            None => continue,
        };
        let (zx, zy) = (value[(0, col)], value[(1, col)]);
        for v in [Vector2::new(zx.re, zy.re), Vector2::new(zx.im, zy.im)] {
            scatter += v * v.transpose();
        }
    }

    if scatter.iter().any(|x| !x.is_finite()) {
        return Err(Error::InvalidParameter(
            "non finite impedance values".to_string(),
        ));
    }

    let eigen = SymmetricEigen::try_new(scatter, f64::EPSILON, 1000)
        .ok_or(Error::SingularDistortion(f64::INFINITY))?;
    let major = eigen.eigenvalues.imax();
    let lambda_max = eigen.eigenvalues[major];
    let lambda_min = eigen.eigenvalues[1 - major].max(0.0);

    if !(lambda_max > 0.0) {
        // null column: D can not be identified
        return Err(Error::SingularDistortion(f64::INFINITY));
    }

    let direction: Vector2<f64> = eigen.eigenvectors.column(major).into_owned().normalize();

    // angular spread of the samples about the fitted direction
    let dof = (2 * indices.len()).saturating_sub(1).max(1) as f64;
    let sigma = (lambda_min / lambda_max / dof).sqrt();
    let error = Vector2::new(direction[1].abs() * sigma, direction[0].abs() * sigma);

    Ok((direction, error))
}

/// Regional strike [deg] from the phase tensor azimuth, averaged
/// modulo 90°. 1D responses carry no strike and are ignored.
fn regional_strike(z: &Impedance, indices: &[usize]) -> f64 {
    let pt = PhaseTensor::from_impedance(z);
    let params = pt.parameters().collect::<Vec<_>>();

    let (sin, cos, count) = indices
        .iter()
        .filter_map(|index| params.get(*index).copied().flatten())
        .filter(|p| p.azimuth.is_finite() && p.ellipticity.abs() > Constants::MIN_ELLIPTICITY)
        .fold((0.0_f64, 0.0_f64, 0_usize), |(s, c, n), p| {
            let angle = (4.0 * p.azimuth).to_radians();
            (s + angle.sin(), c + angle.cos(), n + 1)
        });

    let strike = sin.atan2(cos).to_degrees() / 4.0;
    if count == 0 || !strike.is_finite() {
        0.0
    } else {
        strike
    }
}

impl Distortion {
    /// Estimates the distortion of given [Impedance], using the `num_freq`
    /// highest frequencies (all frequencies by default).
    pub fn estimate(z: &Impedance, num_freq: Option<usize>) -> Result<Self, Error> {
        let total = z.len();
        let num_freq = num_freq.unwrap_or(total);

        if num_freq < Constants::MIN_SAMPLES || num_freq > total {
            return Err(Error::InvalidParameter(format!(
                "num_freq must lie within [{}, {}], got {}",
                Constants::MIN_SAMPLES,
                total,
                num_freq
            )));
        }

        let frequencies = z.frequencies();
        let indices = (0..total)
            .sorted_by(|a, b| {
                frequencies[*b]
                    .partial_cmp(&frequencies[*a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .take(num_freq)
            .filter(|index| z.is_complete(*index))
            .collect::<Vec<_>>();

        if indices.len() < Constants::MIN_SAMPLES {
            return Err(Error::InvalidParameter(format!(
                "only {} complete tensors among the {} highest frequencies",
                indices.len(),
                num_freq
            )));
        }

        let strike = regional_strike(z, &indices);
        let z_strike = z.rotate(strike);

        // Z' = D' Z0, Z0 = [[0, a], [b, 0]]:
        //  1st column of D' is carried by Z'_y, 2nd column by Z'_x
        let (mut d1, e1) = fit_direction(&z_strike, &indices, 1)?;
        let (mut d2, e2) = fit_direction(&z_strike, &indices, 0)?;

        // positive diagonal: no distortion means D = I
        if d1[0] < 0.0 {
            d1 = -d1;
        }
        if d2[1] < 0.0 {
            d2 = -d2;
        }

        let d_strike = Matrix2::from_columns(&[d1, d2]);
        let e_strike = Matrix2::from_columns(&[e1, e2]);

        // D' = R D R^T
        let r = rotation_matrix(strike);
        let matrix = r.transpose() * d_strike * r;
        let error = rotate_errors(&r.transpose(), &e_strike, &r);

        let distortion = Self {
            matrix,
            error,
            strike,
            samples: indices.len(),
        };

        let condition = distortion.condition_number();

        #[cfg(feature = "log")]
        debug!(
            "distortion: strike={:.3}° samples={} condition={:.3e}",
            strike,
            indices.len(),
            condition
        );

        if !(condition <= Constants::CONDITION_LIMIT) {
            return Err(Error::SingularDistortion(condition));
        }

        Ok(distortion)
    }

    /// Builds a [Distortion] from a known matrix, without uncertainty
    pub fn from_matrix(matrix: Matrix2<f64>) -> Result<Self, Error> {
        let distortion = Self {
            matrix,
            error: Matrix2::zeros(),
            strike: 0.0,
            samples: 0,
        };
        let condition = distortion.condition_number();
        if !(condition <= Constants::CONDITION_LIMIT) {
            return Err(Error::SingularDistortion(condition));
        }
        Ok(distortion)
    }

    pub fn matrix(&self) -> &Matrix2<f64> {
        &self.matrix
    }

    pub fn error(&self) -> &Matrix2<f64> {
        &self.error
    }

    /// Regional strike [deg] the estimation was carried in
    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Ratio of extreme singular values of D
    pub fn condition_number(&self) -> f64 {
        let singular = self.matrix.svd(false, false).singular_values;
        let (max, min) = (singular.max(), singular.min());
        if min > 0.0 {
            max / min
        } else {
            f64::INFINITY
        }
    }

    /// Returns Z0 = D⁻¹ Z at every frequency. Uncertainties of Z and D
    /// are propagated to first order.
    pub fn remove(&self, z: &Impedance) -> Result<Impedance, Error> {
        let inverse = self
            .matrix
            .try_inverse()
            .ok_or(Error::SingularDistortion(f64::INFINITY))?;

        let mut corrected = z.transform(&inverse, &Matrix2::identity(), true);

        // δ(D⁻¹) = -D⁻¹ δD D⁻¹
        let inverse_err = rotate_errors(&inverse, &self.error, &inverse);
        let inverse_var = inverse_err.map(|e| e * e);

        let mask = corrected.mask().to_vec();

        for (index, errors) in corrected.errors_mut().iter_mut().enumerate() {
            for i in 0..2 {
                for j in 0..2 {
                    if !mask[index][(i, j)] {
                        continue;
                    }
                    let mut extra = 0.0_f64;
                    for k in 0..2 {
                        if let Some((value, _)) = z.entry(index, k, j) {
                            extra += inverse_var[(i, k)] * value.norm_sqr();
                        }
                    }
                    errors[(i, j)] = (errors[(i, j)].powi(2) + extra).sqrt();
                }
            }
        }

        Ok(corrected)
    }
}

/// First order propagation of independent uncertainties through A M B
fn rotate_errors(a: &Matrix2<f64>, m: &Matrix2<f64>, b: &Matrix2<f64>) -> Matrix2<f64> {
    Matrix2::from_fn(|i, j| {
        let mut variance = 0.0_f64;
        for k in 0..2 {
            for l in 0..2 {
                variance += (a[(i, k)] * b[(l, j)] * m[(k, l)]).powi(2);
            }
        }
        variance.sqrt()
    })
}

/// Estimates & removes galvanic distortion from given [Impedance],
/// using the `num_freq` highest frequencies for the estimation.
/// Returns the [Distortion] and the corrected [Impedance].
pub fn remove_distortion(z: &Impedance, num_freq: Option<usize>) -> Result<(Distortion, Impedance), Error> {
    let distortion = Distortion::estimate(z, num_freq)?;
    let corrected = distortion.remove(z)?;
    Ok((distortion, corrected))
}
