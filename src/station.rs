//! MT station: one impedance tensor, one (possibly empty) tipper,
//! a location and the rotation applied to both transfer functions.
use crate::{
    distortion::{remove_distortion, Distortion},
    error::Error,
    interpolation::{interpolate, InterpolationOptions},
    location::{Location, Projection, UtmZone},
    phase_tensor::PhaseTensor,
    rotation::Rotate,
    static_shift::remove_static_shift,
    tensor::{Impedance, TensorArray, Tipper},
};

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Station {
    /// Station name, unique within a survey
    pub name: String,
    location: Location,
    /// Z in the current frame
    impedance: Impedance,
    /// T in the current frame. Empty when the station has no tipper.
    tipper: Tipper,
    /// Z as provided, every rotation starts from it
    source_impedance: Impedance,
    /// T as provided, every rotation starts from it
    source_tipper: Tipper,
    /// Current frame of Z and T, degrees clockwise from north
    applied_rotation: f64,
}

/// Expresses `source` in the frame `angle` degrees clockwise from north,
/// in a single rotation
fn in_frame<const R: usize>(source: &TensorArray<R>, angle: f64) -> TensorArray<R>
where
    TensorArray<R>: Rotate,
{
    let delta = angle - source.rotation_angle();
    if delta == 0.0 {
        source.clone()
    } else {
        source.rotate(delta)
    }
}

impl Station {
    /// Builds a new empty [Station]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Copies and returns [Station] with given [Impedance]
    pub fn with_impedance(&self, z: Impedance) -> Self {
        let mut s = self.clone();
        s.set_impedance(z);
        s
    }

    /// Copies and returns [Station] with given [Tipper]
    pub fn with_tipper(&self, tipper: Tipper) -> Self {
        let mut s = self.clone();
        s.set_tipper(tipper);
        s
    }

    /// Copies and returns [Station] at given [Location]
    pub fn with_location(&self, location: Location) -> Self {
        let mut s = self.clone();
        s.location = location;
        s
    }

    /// Replaces the [Impedance] wholesale, as is. Its rotation angle
    /// becomes the frame of this station: the [Tipper] follows.
    pub fn set_impedance(&mut self, z: Impedance) {
        self.applied_rotation = z.rotation_angle();
        self.impedance = z.clone();
        self.source_impedance = z;
        self.tipper = in_frame(&self.source_tipper, self.applied_rotation);
    }

    /// Replaces the [Tipper] wholesale. It is expressed in the frame
    /// of the [Impedance], or defines the frame of this station
    /// when the latter is empty.
    pub fn set_tipper(&mut self, tipper: Tipper) {
        if self.impedance.is_empty() {
            self.applied_rotation = tipper.rotation_angle();
        }
        self.tipper = in_frame(&tipper, self.applied_rotation);
        self.source_tipper = tipper;
    }

    pub fn impedance(&self) -> &Impedance {
        &self.impedance
    }

    pub fn tipper(&self) -> &Tipper {
        &self.tipper
    }

    pub fn has_tipper(&self) -> bool {
        !self.tipper.is_empty()
    }

    /// Phase tensor view of the current [Impedance]
    pub fn phase_tensor(&self) -> PhaseTensor {
        PhaseTensor::from_impedance(&self.impedance)
    }

    /// Rotation currently applied to Z and T,
    /// in degrees clockwise from north
    pub fn rotation_angle(&self) -> f64 {
        self.applied_rotation
    }

    /// Rotates Z and T in lock step so they end up expressed
    /// `angle` degrees clockwise from north. Repeating the same call is a no-op.
    /// Both are rotated from the arrays as provided, in a single step:
    /// rotating back to their original frame restores them exactly.
    pub fn rotate_to(&mut self, angle: f64) {
        if angle == self.applied_rotation {
            return;
        }

        #[cfg(feature = "log")]
        debug!(
            "{}: rotating by {:.3}° ({:.3}° -> {:.3}°)",
            self.name,
            angle - self.applied_rotation,
            self.applied_rotation,
            angle
        );

        self.impedance = in_frame(&self.source_impedance, angle);
        self.tipper = in_frame(&self.source_tipper, angle);
        self.applied_rotation = angle;
    }

    /// Estimates and removes galvanic distortion, see [Distortion::estimate].
    /// The station itself is not modified.
    pub fn remove_distortion(&self, num_freq: Option<usize>) -> Result<(Distortion, Impedance), Error> {
        remove_distortion(&self.impedance, num_freq)
    }

    /// Returns the [Impedance] corrected for static shift.
    /// The station itself is not modified.
    pub fn remove_static_shift(&self, ss_x: f64, ss_y: f64) -> Result<Impedance, Error> {
        remove_static_shift(&self.impedance, ss_x, ss_y)
    }

    /// Interpolates Z and T onto `new_frequencies` [Hz].
    /// The station itself is not modified.
    pub fn interpolate(
        &self,
        new_frequencies: &[f64],
        options: &InterpolationOptions,
    ) -> Result<(Impedance, Tipper), Error> {
        interpolate(&self.impedance, &self.tipper, new_frequencies, options)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Sets geodetic coordinates, which become authoritative
    pub fn set_geodetic(&mut self, latitude: f64, longitude: f64) -> Result<(), Error> {
        Ok(self.location.set_geodetic(latitude, longitude)?)
    }

    /// Sets UTM coordinates, which become authoritative
    pub fn set_projected(&mut self, easting: f64, northing: f64, zone: UtmZone) {
        self.location.set_projected(easting, northing, zone);
    }

    pub fn set_elevation(&mut self, elevation: f64) {
        self.location.set_elevation(elevation);
    }

    /// Recomputes the non authoritative coordinates
    pub fn reconcile_location<P: Projection>(&mut self, projection: &P) -> Result<(), Error> {
        Ok(self.location.reconcile(projection)?)
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Station: {}", self.name)?;
        writeln!(f, "{}", "-".repeat(50))?;
        match self.location.geodetic() {
            Some(geo) => {
                writeln!(f, "\tLatitude:      {:.3}", geo.latitude)?;
                writeln!(f, "\tLongitude:     {:.3}", geo.longitude)?;
            },
            None => {
                writeln!(f, "\tLatitude:      unknown")?;
                writeln!(f, "\tLongitude:     unknown")?;
            },
        }
        if let Some(utm) = self.location.projected() {
            writeln!(f, "\tUTM:           {}", utm)?;
        }
        writeln!(f, "\tElevation:     {:.3}", self.location.elevation())?;
        writeln!(
            f,
            "\tTipper:        {}",
            if self.has_tipper() { "True" } else { "False" }
        )?;
        write!(f, "\tPeriods: {}", self.impedance.len())?;
        if let Some((min, max)) = self.impedance.frequency_range() {
            writeln!(f)?;
            writeln!(
                f,
                "\t\tPeriod Range:   {:.5E}  -- {:.5E} s",
                1.0 / max,
                1.0 / min
            )?;
            write!(f, "\t\tFrequency Range {:.5E}  -- {:.5E} Hz", min, max)?;
        }
        Ok(())
    }
}
