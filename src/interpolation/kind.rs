use strum_macros::EnumString;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 1D interpolation method
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum InterpolationKind {
    /// Piecewise linear
    #[default]
    #[strum(serialize = "slinear", serialize = "linear")]
    Linear,
    /// Nearest sample, lower sample on ties
    #[strum(serialize = "nearest")]
    Nearest,
    /// Previous sample (zero order hold)
    #[strum(serialize = "zero", serialize = "previous")]
    Zero,
    /// Natural cubic spline
    #[strum(serialize = "cubic")]
    Cubic,
}

impl std::fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "slinear"),
            Self::Nearest => write!(f, "nearest"),
            Self::Zero => write!(f, "zero"),
            Self::Cubic => write!(f, "cubic"),
        }
    }
}

/// 1D interpolator over strictly increasing abscissas.
/// Never extrapolates.
#[derive(Debug, Clone)]
pub struct Interpolator {
    kind: InterpolationKind,
    x: Vec<f64>,
    y: Vec<f64>,
    /// Spline second derivatives, only for [InterpolationKind::Cubic]
    second: Vec<f64>,
}

impl Interpolator {
    /// Builds a new [Interpolator]. Returns None when fewer than 2 points
    /// are provided, when lengths differ, or when `x` is not strictly increasing.
    pub fn new(kind: InterpolationKind, x: &[f64], y: &[f64]) -> Option<Self> {
        if x.len() < 2 || x.len() != y.len() {
            return None;
        }
        if x.windows(2).any(|w| !(w[1] > w[0])) {
            return None;
        }
        let second = match kind {
            InterpolationKind::Cubic => natural_spline(x, y),
            _ => Vec::new(),
        };
        Some(Self {
            kind,
            x: x.to_vec(),
            y: y.to_vec(),
            second,
        })
    }

    pub fn kind(&self) -> InterpolationKind {
        self.kind
    }

    /// Returns (min, max) abscissa
    pub fn range(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Evaluates at `x`. None outside of the abscissa range.
    pub fn eval(&self, x: f64) -> Option<f64> {
        let (min, max) = self.range();
        if !(x >= min && x <= max) {
            return None;
        }

        // segment [x_i, x_i+1] containing x
        let n = self.x.len();
        let i = self.x.partition_point(|xi| *xi <= x).saturating_sub(1).min(n - 2);

        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let h = x1 - x0;

        let value = match self.kind {
            InterpolationKind::Linear => y0 + (y1 - y0) * (x - x0) / h,
            InterpolationKind::Nearest => {
                if x - x0 <= x1 - x {
                    y0
                } else {
                    y1
                }
            },
            InterpolationKind::Zero => {
                if x < x1 {
                    y0
                } else {
                    y1
                }
            },
            InterpolationKind::Cubic => {
                let (m0, m1) = (self.second[i], self.second[i + 1]);
                let (a, b) = (x1 - x, x - x0);
                m0 * a.powi(3) / (6.0 * h)
                    + m1 * b.powi(3) / (6.0 * h)
                    + (y0 / h - m0 * h / 6.0) * a
                    + (y1 / h - m1 * h / 6.0) * b
            },
        };
        Some(value)
    }
}

/// Second derivatives of the natural cubic spline through (x, y),
/// solved with the Thomas algorithm.
fn natural_spline(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut second = vec![0.0_f64; n];
    if n < 3 {
        return second;
    }

    let h = x.windows(2).map(|w| w[1] - w[0]).collect::<Vec<_>>();

    // tridiagonal system over interior knots
    let m = n - 2;
    let mut diag = vec![0.0_f64; m];
    let mut upper = vec![0.0_f64; m];
    let mut rhs = vec![0.0_f64; m];

    for k in 0..m {
        let i = k + 1;
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        upper[k] = h[i];
        rhs[k] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
    }

    // forward sweep, lower[k] = h[k]
    for k in 1..m {
        let w = h[k] / diag[k - 1];
        diag[k] -= w * upper[k - 1];
        rhs[k] -= w * rhs[k - 1];
    }

    // back substitution
    second[m] = rhs[m - 1] / diag[m - 1];
    for k in (0..m - 1).rev() {
        second[k + 1] = (rhs[k] - upper[k] * second[k + 2]) / diag[k];
    }

    second
}
