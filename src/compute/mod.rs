//! Compute layer for projection, indexing and input processing.
//!
//! This module separates the numeric building blocks of clustering from the
//! cluster hierarchy itself. It provides:
//! - Spherical Mercator projection into the unit square
//! - Bulk-loaded per-level spatial indexes
//! - Coordinate and bounding-box validation
//! - GeoJSON input parsing

pub mod geojson;
pub mod projection;
pub mod spatial;
pub mod validation;
