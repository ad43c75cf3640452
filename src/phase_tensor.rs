//! Phase tensor (Caldwell et al., 2004).
//! Φ = X⁻¹ Y where Z = X + iY. Galvanic distortion does not affect Φ.
use nalgebra::Matrix2;

use crate::tensor::Impedance;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Phase tensor invariants & angles, at one frequency. Angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseTensorParameters {
    pub phimin: f64,
    pub phimax: f64,
    pub alpha: f64,
    pub beta: f64,
    /// Ellipse major axis orientation: alpha - beta
    pub azimuth: f64,
    /// Skew angle: beta
    pub skew: f64,
    /// (phimax - phimin) / (phimax + phimin)
    pub ellipticity: f64,
}

impl PhaseTensorParameters {
    fn new(phi: &Matrix2<f64>) -> Self {
        let (p11, p12, p21, p22) = (phi[(0, 0)], phi[(0, 1)], phi[(1, 0)], phi[(1, 1)]);

        let pi1 = 0.5 * (p11 - p22).hypot(p12 + p21);
        let pi2 = 0.5 * (p11 + p22).hypot(p12 - p21);

        let phimax = (pi2 + pi1).atan().to_degrees();
        let phimin = (pi2 - pi1).atan().to_degrees();

        let alpha = 0.5 * (p12 + p21).atan2(p11 - p22).to_degrees();
        let beta = 0.5 * (p12 - p21).atan2(p11 + p22).to_degrees();

        let ellipticity = if phimax + phimin != 0.0 {
            (phimax - phimin) / (phimax + phimin)
        } else {
            0.0
        };

        Self {
            phimin,
            phimax,
            alpha,
            beta,
            azimuth: alpha - beta,
            skew: beta,
            ellipticity,
        }
    }
}

/// Phase tensor view of an [Impedance]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseTensor {
    /// Φ at each frequency. None where Z is incomplete or Re(Z) is singular.
    tensors: Vec<Option<Matrix2<f64>>>,
    frequencies: Vec<f64>,
    rotation_angle: f64,
}

impl PhaseTensor {
    /// Computes the phase tensor from given [Impedance]
    pub fn from_impedance(z: &Impedance) -> Self {
        let tensors = z
            .values()
            .iter()
            .enumerate()
            .map(|(index, value)| {
                if !z.is_complete(index) {
                    return None;
                }
                let x = value.map(|c| c.re);
                let y = value.map(|c| c.im);
                x.try_inverse().map(|x_inv| x_inv * y)
            })
            .collect();

        Self {
            tensors,
            frequencies: z.frequencies().to_vec(),
            rotation_angle: z.rotation_angle(),
        }
    }

    pub fn tensors(&self) -> &[Option<Matrix2<f64>>] {
        &self.tensors
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Rotation of the frame this phase tensor is expressed in
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Invariants and angles at each frequency
    pub fn parameters(&self) -> impl Iterator<Item = Option<PhaseTensorParameters>> + '_ {
        self.tensors
            .iter()
            .map(|phi| phi.as_ref().map(PhaseTensorParameters::new))
    }

    /// Minimum phase [deg] at each frequency
    pub fn phimin(&self) -> Vec<Option<f64>> {
        self.parameters().map(|p| p.map(|p| p.phimin)).collect()
    }

    /// Maximum phase [deg] at each frequency
    pub fn phimax(&self) -> Vec<Option<f64>> {
        self.parameters().map(|p| p.map(|p| p.phimax)).collect()
    }

    /// Azimuth [deg] at each frequency
    pub fn azimuth(&self) -> Vec<Option<f64>> {
        self.parameters().map(|p| p.map(|p| p.azimuth)).collect()
    }

    /// Skew angle [deg] at each frequency
    pub fn skew(&self) -> Vec<Option<f64>> {
        self.parameters().map(|p| p.map(|p| p.skew)).collect()
    }
}

impl From<&Impedance> for PhaseTensor {
    fn from(z: &Impedance) -> Self {
        Self::from_impedance(z)
    }
}
