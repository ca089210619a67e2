//! Validation for clustering input and query windows.
//!
//! Coordinates only need to be finite: out-of-range longitudes are accepted
//! as given and latitudes saturate during projection.

use crate::error::{ClusterError, Result};
use geocluster_types::bbox::GeoBounds;
use geocluster_types::point::PointFeature;

/// Validates that a point has finite longitude and latitude.
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_point;
/// use geocluster::PointFeature;
///
/// assert!(validate_point(&PointFeature::new(-74.0060, 40.7128)).is_ok());
/// // Out of range but finite is accepted
/// assert!(validate_point(&PointFeature::new(200.0, 95.0)).is_ok());
/// assert!(validate_point(&PointFeature::new(f64::NAN, 0.0)).is_err());
/// ```
pub fn validate_point(point: &PointFeature) -> Result<()> {
    if !point.lon().is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            point.lon()
        )));
    }

    if !point.lat().is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            point.lat()
        )));
    }

    Ok(())
}

/// Validates multiple points, reporting the position of the first bad one.
pub fn validate_points(points: &[PointFeature]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        validate_point(point)
            .map_err(|e| ClusterError::InvalidInput(format!("Point at index {}: {}", idx, e)))?;
    }
    Ok(())
}

/// Validates a query window: all edges finite and `south <= north`.
///
/// `west > east` is allowed and denotes an antimeridian crossing.
pub fn validate_bounds(bounds: &GeoBounds) -> Result<()> {
    if !bounds.is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Bounding box must contain finite numbers, got: {:?}",
            bounds.to_array()
        )));
    }

    if bounds.south > bounds.north {
        return Err(ClusterError::InvalidInput(format!(
            "min_lat ({}) must be <= max_lat ({})",
            bounds.south, bounds.north
        )));
    }

    Ok(())
}
