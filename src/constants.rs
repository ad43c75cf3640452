//! Constants used across the transfer function toolkit

/// Apparent resistivity scaling, for impedances expressed in [mV/km/nT]:
/// rho = 0.2 / f * |Z|^2
pub(crate) const RESISTIVITY_FACTOR: f64 = 0.2;

/// Weights below this threshold are ignored
/// when entries are mixed into one another (rotation, inversion).
pub(crate) const NEGLIGIBLE_WEIGHT: f64 = 1.0E-12;

/// Distortion estimation related constants
pub(crate) struct Distortion;

impl Distortion {
    /// Minimal number of samples to fit a real 2x2 matrix
    pub const MIN_SAMPLES: usize = 4;
    /// Condition number above which D is considered singular
    pub const CONDITION_LIMIT: f64 = 1.0E6;
    /// Phase tensors flatter than this (ellipticity) carry no strike information
    pub const MIN_ELLIPTICITY: f64 = 1.0E-6;
}

/// Transverse Mercator (UTM) projection constants
pub(crate) struct Utm;

impl Utm {
    /// Central meridian scale factor
    pub const K0: f64 = 0.9996;
    /// False easting [m]
    pub const FALSE_EASTING: f64 = 500_000.0;
    /// False northing, southern hemisphere [m]
    pub const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
    /// Northernmost latitude covered by UTM bands [ddeg]
    pub const MAX_LATITUDE: f64 = 84.0;
    /// Southernmost latitude covered by UTM bands [ddeg]
    pub const MIN_LATITUDE: f64 = -80.0;
}
