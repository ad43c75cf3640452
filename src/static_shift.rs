//! Static shift correction
use nalgebra::Matrix2;

use crate::{error::Error, tensor::Impedance};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Static shift factors, applied to the apparent resistivity of
/// the x (north) and y (east) rows.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StaticShift {
    pub ss_x: f64,
    pub ss_y: f64,
}

impl Default for StaticShift {
    fn default() -> Self {
        Self {
            ss_x: 1.0,
            ss_y: 1.0,
        }
    }
}

impl StaticShift {
    /// Builds new [StaticShift]; both factors must be strictly positive.
    pub fn new(ss_x: f64, ss_y: f64) -> Result<Self, Error> {
        for (name, value) in [("ss_x", ss_x), ("ss_y", ss_y)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "static shift {} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(Self { ss_x, ss_y })
    }

    /// Shift matrix S = diag(√ss_x, √ss_y), such that Z = S Z0
    pub fn matrix(&self) -> Matrix2<f64> {
        Matrix2::new(self.ss_x.sqrt(), 0.0, 0.0, self.ss_y.sqrt())
    }

    /// Returns Z0 = S⁻¹ Z. Rows are scaled, uncertainties are kept as is.
    pub fn remove(&self, z: &Impedance) -> Impedance {
        let inverse = Matrix2::new(1.0 / self.ss_x.sqrt(), 0.0, 0.0, 1.0 / self.ss_y.sqrt());
        z.transform(&inverse, &Matrix2::identity(), false)
    }
}

/// Removes static shift from given [Impedance]
pub fn remove_static_shift(z: &Impedance, ss_x: f64, ss_y: f64) -> Result<Impedance, Error> {
    Ok(StaticShift::new(ss_x, ss_y)?.remove(z))
}
