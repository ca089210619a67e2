//! # geocluster-types
//!
//! Core data types shared by the geocluster engine and its adapters.
//!
//! - **Point types**: `PointFeature`, the input record of the clustering engine
//! - **Tile types**: `TileCoord`, `TileFeature`
//! - **Bounds types**: `GeoBounds`, a longitude/latitude query window
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::point::PointFeature;
//!
//! let feature = PointFeature::new(-74.0060, 40.7128).with_property("name", "NYC");
//! assert_eq!(feature.lon(), -74.0060);
//! ```

pub mod bbox;
pub mod point;
pub mod tile;

pub use bbox::GeoBounds;
pub use point::{PointFeature, Properties};
pub use tile::{TileCoord, TileFeature};
