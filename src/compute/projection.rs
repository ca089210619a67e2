//! Spherical Mercator projection into the unit square.
//!
//! Longitude maps linearly onto `x` and latitude through the Mercator
//! stretch onto `y`, both normalized to `[0, 1]` with `y` growing south.
//! At zoom `z` one unit of projected distance spans `extent * 2^z` pixels,
//! which is what makes a fixed pixel radius meaningful at every zoom.

use geo::{Coord, Point, coord};
use std::f64::consts::PI;

/// Latitude at which the Mercator square ends (`atan(sinh(PI))` in degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Longitude in degrees to projected `x`.
#[inline]
pub fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Latitude in degrees to projected `y`. Latitudes beyond the Mercator
/// limit saturate at the top or bottom edge.
#[inline]
pub fn lat_y(lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let y = 0.5 - lat.to_radians().tan().asinh() / (2.0 * PI);
    y.clamp(0.0, 1.0)
}

/// Projected `x` back to longitude in degrees.
#[inline]
pub fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Projected `y` back to latitude in degrees.
#[inline]
pub fn y_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0).to_radians();
    360.0 * y2.exp().atan() / PI - 90.0
}

/// Project a geographic point.
pub fn project(point: &Point<f64>) -> Coord<f64> {
    coord! { x: lng_x(point.x()), y: lat_y(point.y()) }
}

/// Inverse of [`project`].
pub fn unproject(coord: Coord<f64>) -> Point<f64> {
    Point::new(x_lng(coord.x), y_lat(coord.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_origin_is_center() {
        assert_eq!(lng_x(0.0), 0.5);
        assert!((lat_y(0.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_edges() {
        assert_eq!(lng_x(-180.0), 0.0);
        assert_eq!(lng_x(180.0), 1.0);
        assert!(lat_y(MAX_LATITUDE).abs() < EPS);
        assert!((lat_y(-MAX_LATITUDE) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_latitude_saturates() {
        assert_eq!(lat_y(90.0), lat_y(MAX_LATITUDE));
        assert_eq!(lat_y(-90.0), lat_y(-MAX_LATITUDE));
        assert!(lat_y(89.999).is_finite());
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            (-74.0060, 40.7128),
            (139.6917, 35.6895),
            (-179.9, -85.0),
            (179.9, 85.0),
            (0.0, 0.0),
            (12.5, -33.3),
        ];
        for (lng, lat) in samples {
            let back = unproject(project(&Point::new(lng, lat)));
            assert!((back.x() - lng).abs() < EPS, "lng {} -> {}", lng, back.x());
            assert!((back.y() - lat).abs() < EPS, "lat {} -> {}", lat, back.y());
        }
    }

    #[test]
    fn test_y_grows_south() {
        assert!(lat_y(10.0) < lat_y(0.0));
        assert!(lat_y(-10.0) > lat_y(0.0));
    }
}
