//! Transfer function re-sampling onto a new frequency grid
use num::complex::Complex64;

use crate::{
    error::Error,
    tensor::{Impedance, TensorArray, Tipper},
};

#[cfg(feature = "log")]
use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod kind;
pub use kind::{InterpolationKind, Interpolator};

/// Interpolation options
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterpolationOptions {
    /// Interpolation method, applied to real part, imaginary part and error
    pub kind: InterpolationKind,
    /// Fails when a target frequency lies outside of the impedance frequency range.
    /// When false, such targets are silently left without data.
    pub bounds_error: bool,
    /// Maximal ratio between a target period and the closest data period.
    /// Values within (0, 1) are understood as 1 + value.
    pub period_buffer: Option<f64>,
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self {
            kind: InterpolationKind::default(),
            bounds_error: true,
            period_buffer: None,
        }
    }
}

impl InterpolationOptions {
    /// Copies and returns [InterpolationOptions] with desired method
    pub fn with_kind(&self, kind: InterpolationKind) -> Self {
        let mut s = *self;
        s.kind = kind;
        s
    }
    /// Copies and returns [InterpolationOptions] with bounds checking preference
    pub fn with_bounds_error(&self, bounds_error: bool) -> Self {
        let mut s = *self;
        s.bounds_error = bounds_error;
        s
    }
    /// Copies and returns [InterpolationOptions] with a period buffer
    pub fn with_period_buffer(&self, buffer: f64) -> Self {
        let mut s = *self;
        s.period_buffer = Some(buffer);
        s
    }
    /// Copies and returns [InterpolationOptions] without period buffer
    pub fn without_period_buffer(&self) -> Self {
        let mut s = *self;
        s.period_buffer = None;
        s
    }

    /// Period buffer ratio actually applied
    pub fn effective_period_buffer(&self) -> Result<Option<f64>, Error> {
        match self.period_buffer {
            None => Ok(None),
            Some(buffer) if !(buffer > 0.0) || buffer.is_infinite() => Err(Error::InvalidParameter(
                format!("period buffer must be positive, got {}", buffer),
            )),
            Some(buffer) if buffer < 1.0 => {
                #[cfg(feature = "log")]
                warn!("period buffer must be > 1: using {}", 1.0 + buffer);
                Ok(Some(1.0 + buffer))
            },
            Some(buffer) => Ok(Some(buffer)),
        }
    }
}

/// Returns true when the closest sample (in log period) lies
/// within `buffer` ratio of the target
fn within_buffer(samples: &[f64], target: f64, buffer: f64) -> bool {
    let log_target = target.log10();
    let mut nearest = None::<(f64, f64)>;
    for f in samples {
        let distance = (f.log10() - log_target).abs();
        match nearest {
            Some((d, _)) if d <= distance => {},
            _ => nearest = Some((distance, *f)),
        }
    }
    match nearest {
        Some((_, f)) => (f / target).max(target / f) < buffer,
        None => false,
    }
}

/// Interpolates one (row, col) component of `source` onto the grid of `output`
fn interpolate_component<const R: usize>(
    source: &TensorArray<R>,
    output: &mut TensorArray<R>,
    row: usize,
    col: usize,
    kind: InterpolationKind,
    buffer: Option<f64>,
) -> Result<(), Error> {
    let mut samples = source.valid_samples(row, col);

    if samples.len() < 2 {
        #[cfg(feature = "log")]
        debug!(
            "({}, {}) component: {} sample(s), not interpolated",
            row,
            col,
            samples.len()
        );
        return Ok(());
    }

    // stable sort: on repeated frequencies, the first sample is kept
    samples.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    #[cfg(feature = "log")]
    let total = samples.len();

    samples.dedup_by(|b, a| a.0 == b.0);

    #[cfg(feature = "log")]
    {
        if samples.len() < total {
            debug!(
                "({}, {}) component: {} repeated frequencies dropped",
                row,
                col,
                total - samples.len()
            );
        }
    }

    let freqs = samples.iter().map(|s| s.0).collect::<Vec<_>>();
    let real = samples.iter().map(|s| s.1.re).collect::<Vec<_>>();
    let imag = samples.iter().map(|s| s.1.im).collect::<Vec<_>>();
    let errs = samples.iter().map(|s| s.2).collect::<Vec<_>>();

    let (real, imag, errs) = match (
        Interpolator::new(kind, &freqs, &real),
        Interpolator::new(kind, &freqs, &imag),
        Interpolator::new(kind, &freqs, &errs),
    ) {
        (Some(real), Some(imag), Some(errs)) => (real, imag, errs),
        _ => {
            #[cfg(feature = "log")]
            debug!("({}, {}) component: not enough distinct frequencies", row, col);
            return Ok(());
        },
    };

    let targets = output
        .frequencies()
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, f)| match buffer {
            Some(buffer) => within_buffer(&freqs, *f, buffer),
            None => true,
        })
        .collect::<Vec<_>>();

    for (index, f) in targets {
        // outside of this component's own range: None
        if let (Some(re), Some(im), Some(err)) = (real.eval(f), imag.eval(f), errs.eval(f)) {
            // splines may overshoot below zero
            output.set_entry(index, row, col, Complex64::new(re, im), err.max(0.0))?;
        }
    }
    Ok(())
}

fn resample<const R: usize>(
    source: &TensorArray<R>,
    new_frequencies: &[f64],
    options: &InterpolationOptions,
    buffer: Option<f64>,
) -> Result<TensorArray<R>, Error> {
    let mut output = TensorArray::<R>::zeros(new_frequencies.to_vec());
    output.set_rotation_angle(source.rotation_angle());
    for row in 0..R {
        for col in 0..2 {
            interpolate_component(source, &mut output, row, col, options.kind, buffer)?;
        }
    }
    Ok(output)
}

/// Interpolates [Impedance] and [Tipper] onto `new_frequencies` [Hz].
/// Each component is interpolated independently, over its own valid
/// samples: gaps of one component do not affect the others.
/// When a frequency is repeated in the source, only its first sample is used.
/// Outputs are indexed by `new_frequencies` as given and keep
/// the source rotation angles. An empty [Tipper] results in an
/// output [Tipper] without data.
pub fn interpolate(
    z: &Impedance,
    tipper: &Tipper,
    new_frequencies: &[f64],
    options: &InterpolationOptions,
) -> Result<(Impedance, Tipper), Error> {
    if let Some(f) = new_frequencies.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
        return Err(Error::InvalidParameter(format!(
            "target frequencies must be positive, got {}",
            f
        )));
    }

    let buffer = options.effective_period_buffer()?;

    if options.bounds_error {
        let (min, max) = z.frequency_range().unwrap_or((f64::NAN, f64::NAN));
        if let Some(f) = new_frequencies.iter().find(|f| !(**f >= min && **f <= max)) {
            return Err(Error::OutOfBounds {
                frequency: *f,
                min,
                max,
            });
        }
    }

    let new_z = resample(z, new_frequencies, options, buffer)?;

    let new_tipper = if tipper.is_empty() {
        let mut empty = Tipper::zeros(new_frequencies.to_vec());
        empty.set_rotation_angle(tipper.rotation_angle());
        empty
    } else {
        resample(tipper, new_frequencies, options, buffer)?
    };

    Ok((new_z, new_tipper))
}
