//! Multi-zoom point clustering for map tiles.
//!
//! Points are clustered once, at build time, for every zoom level between
//! `min_zoom` and `max_zoom`. Queries afterwards are cheap reads against a
//! per-zoom spatial index.
//!
//! ```rust
//! use geocluster::{ClusterIndex, ClusterOptions, PointFeature};
//!
//! let points = vec![
//!     PointFeature::new(-74.0060, 40.7128).with_property("name", "NYC"),
//!     PointFeature::new(-74.0050, 40.7130).with_property("name", "Tribeca"),
//!     PointFeature::new(2.3522, 48.8566).with_property("name", "Paris"),
//! ];
//! let index = ClusterIndex::new(points, ClusterOptions::default())?;
//!
//! let tile = index.get_tile(0, 0, 0)?;
//! assert_eq!(tile.len(), 2);
//! # Ok::<(), geocluster::ClusterError>(())
//! ```

pub mod cluster;
pub mod compute;
pub mod config;
pub mod error;
pub mod ffi;
pub mod registry;

pub use cluster::output::{feature_cluster_id, feature_point_count};
pub use cluster::{
    ClusterId, ClusterIndex, ClusterStats, PropertyReducer, PropertySum, abbreviate_count,
};
pub use config::{ClusterOptions, MAX_SUPPORTED_ZOOM};
pub use error::{ClusterError, ErrorKind, Result};
pub use registry::{ClusterRegistry, SessionName};

pub use geocluster_types::{GeoBounds, PointFeature, Properties, TileCoord, TileFeature};

pub use geo::Point;
pub use geojson::Feature;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterError, ClusterIndex, ClusterOptions, Result};

    pub use crate::{ClusterRegistry, SessionName};

    pub use crate::{PropertyReducer, PropertySum};

    pub use crate::{GeoBounds, PointFeature, Properties, TileFeature};

    pub use geo::Point;
}
