use super::TensorArray;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tipper T, complex 1x2 per frequency: relates the vertical
/// magnetic field to the horizontal (x=north, y=east) magnetic fields.
pub type Tipper = TensorArray<1>;

/// Induction arrows, at one frequency.
/// Directions follow the Parkinson convention (pointing towards
/// conductors) and are expressed in degrees clockwise from north.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InductionArrows {
    pub real_magnitude: f64,
    pub real_direction: f64,
    pub imag_magnitude: f64,
    pub imag_direction: f64,
    /// Magnitude uncertainty
    pub magnitude_err: f64,
}

impl Tipper {
    /// Induction arrows, computed from current values.
    /// None where one of both components is missing.
    pub fn induction_arrows(&self) -> Vec<Option<InductionArrows>> {
        (0..self.len())
            .map(|index| {
                let (tx, tx_err) = self.entry(index, 0, 0)?;
                let (ty, ty_err) = self.entry(index, 0, 1)?;
                Some(InductionArrows {
                    real_magnitude: tx.re.hypot(ty.re),
                    real_direction: (-ty.re).atan2(-tx.re).to_degrees(),
                    imag_magnitude: tx.im.hypot(ty.im),
                    imag_direction: (-ty.im).atan2(-tx.im).to_degrees(),
                    magnitude_err: tx_err.hypot(ty_err),
                })
            })
            .collect()
    }

    /// Amplitude and phase [deg] of both components, at each frequency.
    /// Missing components report null values.
    pub fn amplitude_phase(&self) -> Vec<([f64; 2], [f64; 2])> {
        (0..self.len())
            .map(|index| {
                let mut amplitude = [0.0_f64; 2];
                let mut phase = [0.0_f64; 2];
                for col in 0..2 {
                    if let Some((t, _)) = self.entry(index, 0, col) {
                        amplitude[col] = t.norm();
                        phase[col] = t.im.atan2(t.re).to_degrees();
                    }
                }
                (amplitude, phase)
            })
            .collect()
    }
}
