/// Builds a [crate::location::Location] from geodetic coordinates in ddeg.
/// Panics on invalid coordinates.
#[macro_export]
macro_rules! geodetic {
    ($lat: expr, $lon: expr) => {
        Location::from_geodetic($lat, $lon).unwrap()
    };
    ($lat: expr, $lon: expr, $elev: expr) => {
        Location::from_geodetic($lat, $lon)
            .unwrap()
            .with_elevation($elev)
    };
}

/// Builds a [crate::location::UtmZone] from a description which must be valid
#[macro_export]
macro_rules! utm_zone {
    ($desc: expr) => {
        UtmZone::from_str($desc).unwrap()
    };
}
