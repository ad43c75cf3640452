//! Station location, in geodetic and/or projected (UTM) coordinates.
//!
//! Both representations are never independently authoritative:
//! setting one of them discards the other, which may then be
//! recomputed explicitly with [Location::reconcile].
use dms_coordinates::DMS;

#[cfg(feature = "log")]
use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod projection;
pub use projection::{Datum, Projection, ProjectionError, TransverseMercator, UtmZone};

/// Parses a latitude or longitude, either in decimal degrees
/// or formatted as "DD:MM:SS.ss". The sign of the degrees applies
/// to the whole position.
pub fn parse_position(position: &str) -> Result<f64, ProjectionError> {
    let trimmed = position.trim();
    if let Ok(ddeg) = trimmed.parse::<f64>() {
        return Ok(ddeg);
    }

    let items = trimmed.split(':').collect::<Vec<_>>();
    if items.len() != 3 {
        return Err(ProjectionError::InvalidPosition(position.to_string()));
    }

    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| ProjectionError::InvalidPosition(position.to_string()))
    };

    let degrees = parse(items[0])?;
    let minutes = parse(items[1])?;
    let seconds = parse(items[2])?;

    if !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return Err(ProjectionError::InvalidPosition(position.to_string()));
    }

    let sign = if items[0].trim().starts_with('-') {
        -1.0
    } else {
        1.0
    };
    Ok(sign * (degrees.abs() + minutes / 60.0 + seconds / 3600.0))
}

/// Geodetic coordinates, in decimal degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeodeticLocation {
    /// Builds a new [GeodeticLocation], |latitude| < 90°, |longitude| < 180°
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ProjectionError> {
        if !(latitude.abs() < 90.0) {
            return Err(ProjectionError::InvalidLatitude(latitude));
        }
        if !(longitude.abs() < 180.0) {
            return Err(ProjectionError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
    /// Builds a new [GeodeticLocation] from readable positions,
    /// see [parse_position]
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, ProjectionError> {
        Self::new(parse_position(latitude)?, parse_position(longitude)?)
    }
}

impl std::fmt::Display for GeodeticLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            DMS::from_ddeg_latitude(self.latitude),
            DMS::from_ddeg_longitude(self.longitude)
        )
    }
}

/// UTM coordinates, in meters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectedLocation {
    pub easting: f64,
    pub northing: f64,
    pub zone: UtmZone,
}

impl std::fmt::Display for ProjectedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:.3}mE {:.3}mN ({})", self.easting, self.northing, self.zone)
    }
}

/// Representation that was set last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Authority {
    Geodetic,
    Projected,
}

/// Station location
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    geodetic: Option<GeodeticLocation>,
    projected: Option<ProjectedLocation>,
    authority: Option<Authority>,
    /// Elevation [m]
    elevation: f64,
    datum: Datum,
}

impl Location {
    /// Builds a [Location] from geodetic coordinates
    pub fn from_geodetic(latitude: f64, longitude: f64) -> Result<Self, ProjectionError> {
        let mut s = Self::default();
        s.set_geodetic(latitude, longitude)?;
        Ok(s)
    }

    /// Builds a [Location] from UTM coordinates
    pub fn from_projected(easting: f64, northing: f64, zone: UtmZone) -> Self {
        let mut s = Self::default();
        s.set_projected(easting, northing, zone);
        s
    }

    /// Copies and returns [Location] with given elevation
    pub fn with_elevation(&self, elevation: f64) -> Self {
        let mut s = self.clone();
        s.set_elevation(elevation);
        s
    }

    /// Copies and returns [Location] with given datum. Coordinates are kept as is.
    pub fn with_datum(&self, datum: Datum) -> Self {
        let mut s = self.clone();
        s.datum = datum;
        s
    }

    /// Sets geodetic coordinates, which become authoritative.
    /// Projected coordinates are discarded.
    pub fn set_geodetic(&mut self, latitude: f64, longitude: f64) -> Result<(), ProjectionError> {
        self.geodetic = Some(GeodeticLocation::new(latitude, longitude)?);
        self.projected = None;
        self.authority = Some(Authority::Geodetic);
        Ok(())
    }

    /// Sets projected coordinates, which become authoritative.
    /// Geodetic coordinates are discarded.
    pub fn set_projected(&mut self, easting: f64, northing: f64, zone: UtmZone) {
        self.projected = Some(ProjectedLocation {
            easting,
            northing,
            zone,
        });
        self.geodetic = None;
        self.authority = Some(Authority::Projected);
    }

    /// Sets elevation [m]. Non finite values are replaced by 0.
    pub fn set_elevation(&mut self, elevation: f64) {
        if elevation.is_finite() {
            self.elevation = elevation;
        } else {
            #[cfg(feature = "log")]
            warn!("{} is not a valid elevation, using 0", elevation);
            self.elevation = 0.0;
        }
    }

    /// Recomputes the non authoritative representation with given [Projection]
    pub fn reconcile<P: Projection>(&mut self, projection: &P) -> Result<(), ProjectionError> {
        match self.authority {
            Some(Authority::Geodetic) => {
                if let Some(geo) = self.geodetic {
                    self.projected =
                        Some(projection.ll_to_utm(geo.latitude, geo.longitude, self.datum)?);
                }
            },
            Some(Authority::Projected) => {
                if let Some(utm) = self.projected {
                    self.geodetic = Some(projection.utm_to_ll(
                        utm.easting,
                        utm.northing,
                        &utm.zone,
                        self.datum,
                    )?);
                }
            },
            None => {},
        }
        Ok(())
    }

    /// Returns true when both representations are available
    pub fn is_reconciled(&self) -> bool {
        self.authority.is_none() || (self.geodetic.is_some() && self.projected.is_some())
    }

    pub fn authority(&self) -> Option<Authority> {
        self.authority
    }

    pub fn geodetic(&self) -> Option<&GeodeticLocation> {
        self.geodetic.as_ref()
    }

    pub fn projected(&self) -> Option<&ProjectedLocation> {
        self.projected.as_ref()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.geodetic.map(|g| g.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.geodetic.map(|g| g.longitude)
    }

    pub fn easting(&self) -> Option<f64> {
        self.projected.map(|p| p.easting)
    }

    pub fn northing(&self) -> Option<f64> {
        self.projected.map(|p| p.northing)
    }

    pub fn utm_zone(&self) -> Option<UtmZone> {
        self.projected.map(|p| p.zone)
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn datum(&self) -> Datum {
        self.datum
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn position_parsing() {
        for (desc, expected) in [
            ("-118.5", -118.5),
            ("-118:30:00", -118.5),
            ("45:15:36", 45.26),
            ("-0:30:00", -0.5),
            (" 12:00:00.0 ", 12.0),
        ] {
            let position = parse_position(desc).unwrap();
            assert!(
                (position - expected).abs() < 1E-9,
                "parsed \"{}\" as {}, expecting {}",
                desc,
                position,
                expected
            );
        }
        for invalid in ["12:61:00", "12:00:60", "12:00", "north", "12:aa:00"] {
            assert!(parse_position(invalid).is_err(), "\"{}\" should not parse", invalid);
        }
    }
}
