use nalgebra::Matrix2;

use super::TensorArray;
use crate::constants::RESISTIVITY_FACTOR;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Impedance tensor Z, complex 2x2 per frequency:
/// relates horizontal electric fields to horizontal magnetic fields.
/// Rows & columns are ordered (x=north, y=east).
pub type Impedance = TensorArray<2>;

/// Apparent resistivity & phase, at one frequency
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResistivityPhase {
    /// Apparent resistivity [Ohm.m]
    pub resistivity: Matrix2<f64>,
    /// Apparent resistivity uncertainty [Ohm.m]
    pub resistivity_err: Matrix2<f64>,
    /// Phase [deg]
    pub phase: Matrix2<f64>,
    /// Phase uncertainty [deg]
    pub phase_err: Matrix2<f64>,
}

impl Impedance {
    /// Apparent resistivity and phase, computed from current values.
    /// Missing entries report null values.
    pub fn resistivity_phase(&self) -> Vec<ResistivityPhase> {
        self.frequencies()
            .iter()
            .enumerate()
            .map(|(index, freq)| {
                let mut rp = ResistivityPhase::default();
                for row in 0..2 {
                    for col in 0..2 {
                        let (z, err) = match self.entry(index, row, col) {
                            Some(entry) => entry,
                            None => continue,
                        };
                        let amplitude = z.norm();
                        let resistivity = RESISTIVITY_FACTOR / freq * amplitude.powi(2);

                        rp.resistivity[(row, col)] = resistivity;
                        rp.phase[(row, col)] = z.im.atan2(z.re).to_degrees();

                        if amplitude > 0.0 {
                            let relative = err / amplitude;
                            rp.resistivity_err[(row, col)] = 2.0 * relative * resistivity;
                            // |err| >= |z| means phase is not constrained at all
                            rp.phase_err[(row, col)] = if relative >= 1.0 {
                                90.0
                            } else {
                                relative.asin().to_degrees()
                            };
                        }
                    }
                }
                rp
            })
            .collect()
    }

    /// Determinant of the impedance tensor, at each frequency.
    /// None when one of the components is missing.
    pub fn determinant(&self) -> Vec<Option<num::complex::Complex64>> {
        (0..self.len())
            .map(|index| {
                let xx = self.entry(index, 0, 0)?.0;
                let xy = self.entry(index, 0, 1)?.0;
                let yx = self.entry(index, 1, 0)?.0;
                let yy = self.entry(index, 1, 1)?.0;
                Some(xx * yy - xy * yx)
            })
            .collect()
    }

    /// Returns true if all four components are defined at this index
    pub fn is_complete(&self, index: usize) -> bool {
        self.mask()
            .get(index)
            .map_or(false, |m| m.iter().all(|valid| *valid))
    }
}
