//! Frequency indexed complex transfer function arrays
use itertools::{Itertools, MinMaxResult};
use nalgebra::{Matrix2, SMatrix};
use num::{complex::Complex64, Zero};

use crate::{constants::NEGLIGIBLE_WEIGHT, error::Error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod impedance;
mod tipper;

pub use impedance::{Impedance, ResistivityPhase};
pub use tipper::{InductionArrows, Tipper};

/// Complex R x 2 transfer function, at one frequency
pub type Tensor<const R: usize> = SMatrix<Complex64, R, 2>;

/// Real R x 2 uncertainties, at one frequency
pub type ErrorTensor<const R: usize> = SMatrix<f64, R, 2>;

/// R x 2 validity flags, at one frequency
pub type Mask<const R: usize> = SMatrix<bool, R, 2>;

/// [TensorArray] stores N complex R x 2 matrices, their N real uncertainties
/// and the N frequencies [Hz] they were measured at, paired by index.
/// Frequencies are not required to be sorted.
///
/// Each entry carries a validity flag. Arrays built with [TensorArray::new]
/// follow the exchange file convention where a complex zero means "no data".
/// Invalid entries always hold the zero sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TensorArray<const R: usize> {
    values: Vec<Tensor<R>>,
    errors: Vec<ErrorTensor<R>>,
    mask: Vec<Mask<R>>,
    frequencies: Vec<f64>,
    /// Accumulated rotation, in degrees clockwise from north
    rotation_angle: f64,
}

fn check_length(field: &'static str, expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            field,
            expected,
            found,
        })
    }
}

impl<const R: usize> TensorArray<R> {
    /// Builds a new [TensorArray]. Validity is derived from the
    /// zero sentinel: null entries are considered missing.
    pub fn new(
        values: Vec<Tensor<R>>,
        errors: Vec<ErrorTensor<R>>,
        frequencies: Vec<f64>,
    ) -> Result<Self, Error> {
        let mask = values.iter().map(|v| v.map(|z| !z.is_zero())).collect();
        Self::with_mask(values, errors, mask, frequencies)
    }

    /// Builds a new [TensorArray] with explicit validity flags.
    /// Values flagged as invalid are replaced by the zero sentinel.
    pub fn with_mask(
        mut values: Vec<Tensor<R>>,
        mut errors: Vec<ErrorTensor<R>>,
        mask: Vec<Mask<R>>,
        frequencies: Vec<f64>,
    ) -> Result<Self, Error> {
        let n = frequencies.len();
        check_length("tensor", n, values.len())?;
        check_length("error", n, errors.len())?;
        check_length("mask", n, mask.len())?;

        for (index, flags) in mask.iter().enumerate() {
            for row in 0..R {
                for col in 0..2 {
                    if !flags[(row, col)] {
                        values[index][(row, col)] = Complex64::zero();
                        errors[index][(row, col)] = 0.0;
                    }
                }
            }
        }

        Ok(Self {
            values,
            errors,
            mask,
            frequencies,
            rotation_angle: 0.0,
        })
    }

    /// Builds an array on given frequency grid, where all entries are missing.
    pub fn zeros(frequencies: Vec<f64>) -> Self {
        let n = frequencies.len();
        Self {
            values: vec![Tensor::<R>::zeros(); n],
            errors: vec![ErrorTensor::<R>::zeros(); n],
            mask: vec![Mask::<R>::from_element(false); n],
            frequencies,
            rotation_angle: 0.0,
        }
    }

    /// Number of frequencies
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Returns true if this array holds no frequency at all
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequencies [Hz], paired with [Self::values] by index
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Periods [s], paired with [Self::values] by index
    pub fn periods(&self) -> Vec<f64> {
        self.frequencies.iter().map(|f| 1.0 / f).collect()
    }

    pub fn values(&self) -> &[Tensor<R>] {
        &self.values
    }

    pub fn errors(&self) -> &[ErrorTensor<R>] {
        &self.errors
    }

    pub fn mask(&self) -> &[Mask<R>] {
        &self.mask
    }

    /// Total rotation applied to this array so far, in degrees
    /// clockwise from north.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    pub(crate) fn set_rotation_angle(&mut self, angle: f64) {
        self.rotation_angle = angle;
    }

    /// Returns tensor measured at given index
    pub fn value(&self, index: usize) -> Option<&Tensor<R>> {
        self.values.get(index)
    }

    /// Returns true if this (index, row, col) entry holds actual data
    pub fn is_valid(&self, index: usize, row: usize, col: usize) -> bool {
        row < R && col < 2 && self.mask.get(index).map_or(false, |m| m[(row, col)])
    }

    /// Returns (value, error) of this entry, if it holds actual data
    pub fn entry(&self, index: usize, row: usize, col: usize) -> Option<(Complex64, f64)> {
        if self.is_valid(index, row, col) {
            Some((
                self.values[index][(row, col)],
                self.errors[index][(row, col)],
            ))
        } else {
            None
        }
    }

    /// Iterates one tensor component over frequency,
    /// as (frequency, Option<(value, error)>)
    pub fn component(
        &self,
        row: usize,
        col: usize,
    ) -> impl Iterator<Item = (f64, Option<(Complex64, f64)>)> + '_ {
        self.frequencies
            .iter()
            .enumerate()
            .map(move |(index, f)| (*f, self.entry(index, row, col)))
    }

    /// Number of frequencies where this component holds actual data
    pub fn valid_count(&self, row: usize, col: usize) -> usize {
        self.component(row, col).filter(|(_, e)| e.is_some()).count()
    }

    /// Returns (min, max) frequency
    pub fn frequency_range(&self) -> Option<(f64, f64)> {
        match self
            .frequencies
            .iter()
            .minmax_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(f) => Some((*f, *f)),
            MinMaxResult::MinMax(min, max) => Some((*min, *max)),
        }
    }

    /// Stores actual data at given entry
    pub fn set_entry(
        &mut self,
        index: usize,
        row: usize,
        col: usize,
        value: Complex64,
        error: f64,
    ) -> Result<(), Error> {
        self.check_entry(index, row, col)?;
        self.values[index][(row, col)] = value;
        self.errors[index][(row, col)] = error;
        self.mask[index][(row, col)] = true;
        Ok(())
    }

    /// Declares given entry as missing
    pub fn invalidate(&mut self, index: usize, row: usize, col: usize) -> Result<(), Error> {
        self.check_entry(index, row, col)?;
        self.values[index][(row, col)] = Complex64::zero();
        self.errors[index][(row, col)] = 0.0;
        self.mask[index][(row, col)] = false;
        Ok(())
    }

    fn check_entry(&self, index: usize, row: usize, col: usize) -> Result<(), Error> {
        if index >= self.len() || row >= R || col >= 2 {
            Err(Error::InvalidParameter(format!(
                "entry ({}, {}, {}) out of {}x{}x2 array",
                index,
                row,
                col,
                self.len(),
                R
            )))
        } else {
            Ok(())
        }
    }

    /// Actual data points of one component, as (frequency, value, error)
    pub(crate) fn valid_samples(&self, row: usize, col: usize) -> Vec<(f64, Complex64, f64)> {
        self.component(row, col)
            .filter_map(|(f, e)| e.map(|(z, err)| (f, z, err)))
            .collect()
    }

    /// Applies M' = left * M * right at every frequency.
    /// Missing entries contribute as the zero sentinel they hold:
    /// an output entry is valid as soon as one valid entry is mixed into it.
    /// When `propagate` is false, input uncertainties are copied as is.
    pub(crate) fn transform(
        &self,
        left: &SMatrix<f64, R, R>,
        right: &Matrix2<f64>,
        propagate: bool,
    ) -> Self {
        let mut output = Self::zeros(self.frequencies.clone());
        output.rotation_angle = self.rotation_angle;

        for (index, (value, (error, mask))) in self
            .values
            .iter()
            .zip(self.errors.iter().zip(self.mask.iter()))
            .enumerate()
        {
            for i in 0..R {
                for j in 0..2 {
                    let mut sum = Complex64::zero();
                    let mut variance = 0.0_f64;
                    let mut valid = false;

                    for k in 0..R {
                        for l in 0..2 {
                            let weight = left[(i, k)] * right[(l, j)];
                            if weight.abs() < NEGLIGIBLE_WEIGHT || !mask[(k, l)] {
                                continue;
                            }
                            valid = true;
                            sum += value[(k, l)] * weight;
                            variance += (weight * error[(k, l)]).powi(2);
                        }
                    }

                    if valid {
                        output.values[index][(i, j)] = sum;
                        output.errors[index][(i, j)] = if propagate {
                            variance.sqrt()
                        } else {
                            error[(i, j)]
                        };
                        output.mask[index][(i, j)] = true;
                    }
                }
            }
        }
        output
    }

    /// Mutable access to the uncertainties, for transforms
    /// adding their own error terms.
    pub(crate) fn errors_mut(&mut self) -> &mut [ErrorTensor<R>] {
        &mut self.errors
    }
}
