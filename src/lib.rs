#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::type_complexity)]

extern crate num;

pub mod distortion;
pub mod interpolation;
pub mod io;
pub mod location;
pub mod phase_tensor;
pub mod rotation;
pub mod static_shift;
pub mod station;
pub mod tensor;

mod constants;
mod error;

#[macro_use]
pub(crate) mod macros;

#[cfg(test)]
mod tests;

pub use error::Error;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        distortion::{remove_distortion, Distortion},
        error::Error,
        interpolation::{interpolate, InterpolationKind, InterpolationOptions, Interpolator},
        io::{FileFormat, StationData, StationReader, StationWriter},
        location::{
            parse_position, Authority, Datum, GeodeticLocation, Location, ProjectedLocation,
            Projection, ProjectionError, TransverseMercator, UtmZone,
        },
        phase_tensor::{PhaseTensor, PhaseTensorParameters},
        rotation::{rotation_matrix, Rotate},
        static_shift::{remove_static_shift, StaticShift},
        station::Station,
        tensor::{
            ErrorTensor, Impedance, InductionArrows, Mask, ResistivityPhase, Tensor, TensorArray,
            Tipper,
        },
    };
    // pub re-export
    pub use nalgebra::{Matrix1, Matrix2};
    pub use num::complex::Complex64;
}
