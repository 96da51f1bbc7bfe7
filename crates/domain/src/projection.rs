//! Spherical Mercator → geographic coordinates.

use std::f64::consts::PI;

/// Half the circumference of the Web-Mercator sphere, in metres.
pub const MERCATOR_HALF_EXTENT: f64 = 20_037_508.34;

/// ESRI and EPSG codes that denote spherical (Web) Mercator.
pub const WEB_MERCATOR_WKIDS: [i64; 3] = [102_100, 102_113, 3857];

/// WGS 84 geographic coordinates.
pub const WGS84_WKID: i64 = 4326;

/// Convert a spherical-Mercator `(x, y)` pair in metres into
/// `(longitude, latitude)` degrees.
///
/// No validation is done; non-finite input yields non-finite output, and very
/// large `y` overflows `exp` into an infinite latitude.
#[must_use]
pub fn to_geographic(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / MERCATOR_HALF_EXTENT) * 180.0;
    let lat = (y / MERCATOR_HALF_EXTENT) * 180.0;
    let lat = 180.0 / PI * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0);
    (lon, lat)
}

/// Whether `wkid` denotes spherical Mercator.
#[must_use]
pub fn is_web_mercator(wkid: i64) -> bool {
    WEB_MERCATOR_WKIDS.contains(&wkid)
}
