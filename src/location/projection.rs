//! Geographic to UTM projection
use lazy_static::lazy_static;
use regex::Regex;
use strum_macros::EnumString;
use thiserror::Error;

use super::{GeodeticLocation, ProjectedLocation};
use crate::constants::Utm;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Projection related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("|latitude| must be < 90°, got {0}")]
    InvalidLatitude(f64),
    #[error("|longitude| must be < 180°, got {0}")]
    InvalidLongitude(f64),
    #[error("latitude {0} is outside of UTM limits (80°S to 84°N)")]
    OutsideUtmLimits(f64),
    #[error("invalid UTM zone \"{0}\"")]
    InvalidZone(String),
    #[error("invalid position \"{0}\"")]
    InvalidPosition(String),
}

/// Reference ellipsoids (Defense Mapping Agency, 1987)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Datum {
    #[default]
    #[strum(serialize = "WGS84", serialize = "WGS-84", serialize = "WGS 84")]
    WGS84,
    #[strum(serialize = "WGS72", serialize = "WGS-72", serialize = "WGS 72")]
    WGS72,
    #[strum(serialize = "GRS80", serialize = "GRS 1980")]
    GRS80,
    #[strum(serialize = "GRS67", serialize = "GRS 1967")]
    GRS67,
    #[strum(serialize = "Airy")]
    Airy,
    #[strum(serialize = "AustralianNational", serialize = "Australian National")]
    AustralianNational,
    #[strum(serialize = "Bessel1841", serialize = "Bessel 1841")]
    Bessel1841,
    #[strum(serialize = "Clarke1866", serialize = "Clarke 1866", serialize = "NAD27")]
    Clarke1866,
    #[strum(serialize = "Clarke1880", serialize = "Clarke 1880")]
    Clarke1880,
    #[strum(serialize = "Everest")]
    Everest,
    #[strum(serialize = "International", serialize = "Hayford")]
    International,
    #[strum(serialize = "Krassovsky")]
    Krassovsky,
}

impl Datum {
    /// Returns (equatorial radius [m], eccentricity squared)
    pub fn ellipsoid(&self) -> (f64, f64) {
        match self {
            Self::WGS84 | Self::GRS80 => (6_378_137.0, 0.00669438),
            Self::WGS72 => (6_378_135.0, 0.006694318),
            Self::GRS67 => (6_378_160.0, 0.006694605),
            Self::Airy => (6_377_563.0, 0.00667054),
            Self::AustralianNational => (6_378_160.0, 0.006694542),
            Self::Bessel1841 => (6_377_397.0, 0.006674372),
            Self::Clarke1866 => (6_378_206.0, 0.006768658),
            Self::Clarke1880 => (6_378_249.0, 0.006803511),
            Self::Everest => (6_377_276.0, 0.006637847),
            Self::International => (6_378_388.0, 0.00672267),
            Self::Krassovsky => (6_378_245.0, 0.006693422),
        }
    }
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

lazy_static! {
    static ref ZONE_RE: Regex = Regex::new(r"^\s*(\d{1,2})\s*([A-Za-z])\s*$").unwrap();
}

/// UTM zone designator: zone number (1..=60) and latitude band letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtmZone {
    pub number: u8,
    pub letter: char,
}

impl UtmZone {
    /// Builds a new [UtmZone], letter must be a valid band (C to X, I and O excluded)
    pub fn new(number: u8, letter: char) -> Result<Self, ProjectionError> {
        let letter = letter.to_ascii_uppercase();
        let valid_letter = ('C'..='X').contains(&letter) && letter != 'I' && letter != 'O';
        if !(1..=60).contains(&number) || !valid_letter {
            return Err(ProjectionError::InvalidZone(format!("{}{}", number, letter)));
        }
        Ok(Self { number, letter })
    }

    /// Zone containing given point, including the Norway and Svalbard exceptions
    pub fn from_latlon(latitude: f64, longitude: f64) -> Result<Self, ProjectionError> {
        if !(latitude.abs() < 90.0) {
            return Err(ProjectionError::InvalidLatitude(latitude));
        }
        if !(longitude.abs() < 180.0) {
            return Err(ProjectionError::InvalidLongitude(longitude));
        }
        let letter = band_letter(latitude).ok_or(ProjectionError::OutsideUtmLimits(latitude))?;

        let mut number = ((longitude + 180.0) / 6.0) as u8 + 1;

        if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
            number = 32;
        }

        if (72.0..84.0).contains(&latitude) {
            if (0.0..9.0).contains(&longitude) {
                number = 31;
            } else if (9.0..21.0).contains(&longitude) {
                number = 33;
            } else if (21.0..33.0).contains(&longitude) {
                number = 35;
            } else if (33.0..42.0).contains(&longitude) {
                number = 37;
            }
        }

        Ok(Self { number, letter })
    }

    /// Bands N and above lie in the northern hemisphere
    pub fn is_northern(&self) -> bool {
        self.letter >= 'N'
    }

    /// Longitude of the zone central meridian [ddeg]
    pub fn central_meridian(&self) -> f64 {
        (self.number as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }
}

impl std::str::FromStr for UtmZone {
    type Err = ProjectionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = ZONE_RE
            .captures(s)
            .ok_or_else(|| ProjectionError::InvalidZone(s.to_string()))?;
        let number = caps[1]
            .parse::<u8>()
            .map_err(|_| ProjectionError::InvalidZone(s.to_string()))?;
        let letter = caps[2]
            .chars()
            .next()
            .ok_or_else(|| ProjectionError::InvalidZone(s.to_string()))?;
        Self::new(number, letter).map_err(|_| ProjectionError::InvalidZone(s.to_string()))
    }
}

impl std::fmt::Display for UtmZone {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.number, self.letter)
    }
}

/// Latitude band letter, 8° wide bands from 80°S, band X spanning 72°N to 84°N
fn band_letter(latitude: f64) -> Option<char> {
    const BANDS: &[u8] = b"CDEFGHJKLMNPQRSTUVWX";
    if !(Utm::MIN_LATITUDE..=Utm::MAX_LATITUDE).contains(&latitude) {
        return None;
    }
    let index = (((latitude - Utm::MIN_LATITUDE) / 8.0) as usize).min(BANDS.len() - 1);
    Some(BANDS[index] as char)
}

/// Coordinates transform service, between geodetic
/// and UTM representations.
pub trait Projection {
    /// Projects (latitude, longitude) [ddeg] onto UTM
    fn ll_to_utm(
        &self,
        latitude: f64,
        longitude: f64,
        datum: Datum,
    ) -> Result<ProjectedLocation, ProjectionError>;

    /// Converts UTM coordinates back to (latitude, longitude)
    fn utm_to_ll(
        &self,
        easting: f64,
        northing: f64,
        zone: &UtmZone,
        datum: Datum,
    ) -> Result<GeodeticLocation, ProjectionError>;
}

/// Transverse Mercator series (USGS Bulletin 1532), sub-meter accuracy
/// within a UTM zone.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TransverseMercator;

impl Projection for TransverseMercator {
    fn ll_to_utm(
        &self,
        latitude: f64,
        longitude: f64,
        datum: Datum,
    ) -> Result<ProjectedLocation, ProjectionError> {
        let zone = UtmZone::from_latlon(latitude, longitude)?;
        let (a, ecc2) = datum.ellipsoid();
        let ecc2_prime = ecc2 / (1.0 - ecc2);

        let lat = latitude.to_radians();
        let lon = longitude.to_radians();
        let lon0 = zone.central_meridian().to_radians();

        let (sin, cos) = lat.sin_cos();
        let tan = lat.tan();

        let n = a / (1.0 - ecc2 * sin.powi(2)).sqrt();
        let t = tan.powi(2);
        let c = ecc2_prime * cos.powi(2);
        let aa = cos * (lon - lon0);

        let m = a
            * ((1.0 - ecc2 / 4.0 - 3.0 * ecc2.powi(2) / 64.0 - 5.0 * ecc2.powi(3) / 256.0) * lat
                - (3.0 * ecc2 / 8.0 + 3.0 * ecc2.powi(2) / 32.0 + 45.0 * ecc2.powi(3) / 1024.0)
                    * (2.0 * lat).sin()
                + (15.0 * ecc2.powi(2) / 256.0 + 45.0 * ecc2.powi(3) / 1024.0) * (4.0 * lat).sin()
                - (35.0 * ecc2.powi(3) / 3072.0) * (6.0 * lat).sin());

        let easting = Utm::K0
            * n
            * (aa
                + (1.0 - t + c) * aa.powi(3) / 6.0
                + (5.0 - 18.0 * t + t.powi(2) + 72.0 * c - 58.0 * ecc2_prime) * aa.powi(5) / 120.0)
            + Utm::FALSE_EASTING;

        let mut northing = Utm::K0
            * (m + n
                * tan
                * (aa.powi(2) / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c.powi(2)) * aa.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t.powi(2) + 600.0 * c - 330.0 * ecc2_prime) * aa.powi(6)
                        / 720.0));

        if latitude < 0.0 {
            northing += Utm::FALSE_NORTHING_SOUTH;
        }

        Ok(ProjectedLocation {
            easting,
            northing,
            zone,
        })
    }

    fn utm_to_ll(
        &self,
        easting: f64,
        northing: f64,
        zone: &UtmZone,
        datum: Datum,
    ) -> Result<GeodeticLocation, ProjectionError> {
        if !easting.is_finite() || !northing.is_finite() {
            return Err(ProjectionError::InvalidPosition(format!(
                "{} {} {}",
                easting, northing, zone
            )));
        }

        let (a, ecc2) = datum.ellipsoid();
        let ecc2_prime = ecc2 / (1.0 - ecc2);
        let e1 = (1.0 - (1.0 - ecc2).sqrt()) / (1.0 + (1.0 - ecc2).sqrt());

        let x = easting - Utm::FALSE_EASTING;
        let y = if zone.is_northern() {
            northing
        } else {
            northing - Utm::FALSE_NORTHING_SOUTH
        };

        let m = y / Utm::K0;
        let mu = m / (a * (1.0 - ecc2 / 4.0 - 3.0 * ecc2.powi(2) / 64.0 - 5.0 * ecc2.powi(3) / 256.0));

        // footpoint latitude
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin();

        let (sin1, cos1) = phi1.sin_cos();
        let tan1 = phi1.tan();

        let n1 = a / (1.0 - ecc2 * sin1.powi(2)).sqrt();
        let t1 = tan1.powi(2);
        let c1 = ecc2_prime * cos1.powi(2);
        let r1 = a * (1.0 - ecc2) / (1.0 - ecc2 * sin1.powi(2)).powf(1.5);
        let d = x / (n1 * Utm::K0);

        let latitude = phi1
            - (n1 * tan1 / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ecc2_prime) * d.powi(4)
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                        - 252.0 * ecc2_prime
                        - 3.0 * c1.powi(2))
                        * d.powi(6)
                        / 720.0);

        let longitude = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ecc2_prime + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos1;

        GeodeticLocation::new(
            latitude.to_degrees(),
            zone.central_meridian() + longitude.to_degrees(),
        )
    }
}
