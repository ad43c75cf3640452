use thiserror::Error;

use crate::location::ProjectionError;

/// Errors that may rise when building or transforming transfer functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Tensor, error, mask and frequency arrays must share the same length
    #[error("{field} length ({found}) does not match frequency count ({expected})")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    /// Interpolation target out of the source frequency range
    #[error("frequency {frequency:.5e} Hz outside of [{min:.5e}, {max:.5e}] Hz")]
    OutOfBounds { frequency: f64, min: f64, max: f64 },
    /// Bad scalar argument
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Distortion matrix fit is numerically unstable
    #[error("singular distortion matrix (condition number {0:.3e})")]
    SingularDistortion(f64),
    /// Coordinates projection failure
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),
}
