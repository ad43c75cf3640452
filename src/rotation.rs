//! Rotation of transfer functions
use nalgebra::{Matrix1, Matrix2};

use crate::tensor::{Impedance, Tipper};

/// Returns the rotation matrix of the (x=north, y=east) frame,
/// for an angle in degrees, positive clockwise from north.
pub fn rotation_matrix(angle: f64) -> Matrix2<f64> {
    let (sin, cos) = angle.to_radians().sin_cos();
    Matrix2::new(cos, sin, -sin, cos)
}

/// The [Rotate] trait is implemented by all types
/// that are expressed in a rotatable (north, east) frame.
/// Rotations accumulate: rotating by 10° then by 5° is
/// equivalent to a single 15° rotation.
pub trait Rotate {
    /// Immutable rotation, by given angle in degrees, clockwise from north
    fn rotate(&self, angle: f64) -> Self;
    /// Mutable rotation, by given angle in degrees, clockwise from north
    fn rotate_mut(&mut self, angle: f64);
}

impl Rotate for Impedance {
    /// Z' = R Z R^T at every frequency
    fn rotate(&self, angle: f64) -> Self {
        let r = rotation_matrix(angle);
        let mut rotated = self.transform(&r, &r.transpose(), true);
        rotated.set_rotation_angle(self.rotation_angle() + angle);
        rotated
    }
    fn rotate_mut(&mut self, angle: f64) {
        *self = self.rotate(angle);
    }
}

impl Rotate for Tipper {
    /// T' = T R^T at every frequency
    fn rotate(&self, angle: f64) -> Self {
        let r = rotation_matrix(angle);
        let mut rotated = self.transform(&Matrix1::identity(), &r.transpose(), true);
        rotated.set_rotation_angle(self.rotation_angle() + angle);
        rotated
    }
    fn rotate_mut(&mut self, angle: f64) {
        *self = self.rotate(angle);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn rotation_matrix_quadrants() {
        let r = rotation_matrix(0.0);
        assert_eq!(r, Matrix2::identity());

        let r = rotation_matrix(90.0);
        assert!((r[(0, 1)] - 1.0).abs() < 1E-12);
        assert!((r[(1, 0)] + 1.0).abs() < 1E-12);
        assert!(r[(0, 0)].abs() < 1E-12);

        let r = rotation_matrix(30.0) * rotation_matrix(-30.0);
        assert!((r - Matrix2::identity()).norm() < 1E-12);
    }
}
