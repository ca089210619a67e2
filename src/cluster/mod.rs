//! Multi-resolution clustering index.
//!
//! A [`ClusterIndex`] holds one level of records per zoom from `min_zoom` to
//! `max_zoom`, plus the leaf level at `max_zoom + 1` with one record per input
//! point. Records reference each other by array position only: every record
//! below the coarsest level points at its parent one level up, and every
//! record above the leaf level knows its children one level down. The
//! structure is built once and is read-only afterwards.
//!
//! ```rust
//! use geocluster::{ClusterIndex, ClusterOptions, PointFeature};
//!
//! let points = vec![
//!     PointFeature::new(0.0, 0.0),
//!     PointFeature::new(0.0001, 0.0001),
//!     PointFeature::new(100.0, 40.0),
//! ];
//! let index = ClusterIndex::new(points, ClusterOptions::default())?;
//!
//! let world = index.get_clusters([-180.0, -90.0, 180.0, 90.0], 0)?;
//! assert_eq!(world.len(), 2);
//! # Ok::<(), geocluster::ClusterError>(())
//! ```

mod builder;
pub mod id;
pub mod output;
mod query;
pub mod reduce;

use crate::compute::projection;
use crate::compute::spatial::LevelIndex;
use crate::compute::validation::validate_points;
use crate::config::ClusterOptions;
use crate::error::{ClusterError, Result};
use geocluster_types::point::{PointFeature, Properties};
use serde::Serialize;
use std::sync::Arc;

pub use id::ClusterId;
pub use output::abbreviate_count;
pub use reduce::{PropertyReducer, PropertySum};

/// How a record came to exist on its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    /// An input point on the leaf level.
    Leaf,
    /// Copied unchanged from this position on the finer level.
    Carried(u32),
    /// Aggregate of `children[start..start + len]` of its own level.
    Merged { start: u32, len: u32 },
}

/// One record of one zoom level.
#[derive(Debug, Clone)]
pub(crate) struct ClusterRecord {
    /// Projected position in the unit square.
    pub x: f64,
    pub y: f64,
    pub num_points: u32,
    /// Position of the parent record on the next coarser level.
    pub parent: Option<u32>,
    pub origin: Origin,
    /// Input position of the first leaf below this record. For a record
    /// representing a single point this is the point itself.
    pub point: u32,
    /// Reduced properties, present on multi-point records when a reducer was used.
    pub properties: Option<Arc<Properties>>,
}

impl ClusterRecord {
    pub(crate) fn leaf(point: u32, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            num_points: 1,
            parent: None,
            origin: Origin::Leaf,
            point,
            properties: None,
        }
    }

    pub(crate) fn is_cluster(&self) -> bool {
        self.num_points > 1
    }
}

/// Records of one zoom level plus the spatial index over them.
#[derive(Debug)]
pub(crate) struct Level {
    pub zoom: u8,
    pub records: Vec<ClusterRecord>,
    /// Child positions on the next finer level, grouped per merged record.
    pub children: Vec<u32>,
    pub index: LevelIndex,
}

impl Level {
    pub(crate) fn new(zoom: u8, records: Vec<ClusterRecord>, children: Vec<u32>) -> Self {
        let index = LevelIndex::bulk_load(records.iter().map(|r| [r.x, r.y]));
        Self {
            zoom,
            records,
            children,
            index,
        }
    }

    /// Positions of the children of `record` on the next finer level.
    pub(crate) fn children_of<'a>(&'a self, record: &'a ClusterRecord) -> &'a [u32] {
        match &record.origin {
            Origin::Leaf => &[],
            Origin::Carried(child) => std::slice::from_ref(child),
            Origin::Merged { start, len } => {
                &self.children[*start as usize..(*start + *len) as usize]
            }
        }
    }
}

/// Per-level record counts of a built index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterStats {
    pub num_points: usize,
    /// `(zoom, record count)` from the coarsest level to the leaf level.
    pub levels: Vec<(u8, usize)>,
}

/// An immutable clustering session over one set of input points.
///
/// Queries take `&self` and never mutate, so an index can be shared across
/// threads (for example behind an `Arc`) without locking.
#[derive(Debug)]
pub struct ClusterIndex {
    options: ClusterOptions,
    points: Vec<PointFeature>,
    /// `levels[i]` holds zoom `options.min_zoom + i`; the last entry is the leaf level.
    levels: Vec<Level>,
}

impl ClusterIndex {
    /// Validate the input and build the full hierarchy.
    pub fn new(points: Vec<PointFeature>, options: ClusterOptions) -> Result<Self> {
        Self::build(points, options, None)
    }

    /// Like [`ClusterIndex::new`], accumulating cluster properties with `reducer`.
    pub fn with_reducer<R>(
        points: Vec<PointFeature>,
        options: ClusterOptions,
        reducer: R,
    ) -> Result<Self>
    where
        R: PropertyReducer,
    {
        Self::build(points, options, Some(&reducer))
    }

    fn build(
        points: Vec<PointFeature>,
        options: ClusterOptions,
        reducer: Option<&dyn PropertyReducer>,
    ) -> Result<Self> {
        options.validate().map_err(ClusterError::InvalidInput)?;
        validate_points(&points)?;
        if points.len() > u32::MAX as usize {
            return Err(ClusterError::InvalidInput(format!(
                "too many points: {}",
                points.len()
            )));
        }

        let levels = builder::build_levels(&points, &options, reducer);
        let index = Self {
            options,
            points,
            levels,
        };
        log::info!(
            "Built cluster index: {} points, zooms {}..={}, {} clusters at zoom {}",
            index.points.len(),
            index.options.min_zoom,
            index.options.max_zoom,
            index.levels.first().map_or(0, |l| l.records.len()),
            index.options.min_zoom
        );
        Ok(index)
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    /// Number of input points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Input points in their original order.
    pub fn points(&self) -> &[PointFeature] {
        &self.points
    }

    pub fn stats(&self) -> ClusterStats {
        ClusterStats {
            num_points: self.points.len(),
            levels: self
                .levels
                .iter()
                .map(|l| (l.zoom, l.records.len()))
                .collect(),
        }
    }

    /// Zoom of the leaf level, one past `max_zoom`.
    pub(crate) fn leaf_zoom(&self) -> u8 {
        self.options.max_zoom + 1
    }

    /// Level for a zoom already clamped into `[min_zoom, max_zoom + 1]`.
    pub(crate) fn level(&self, zoom: u8) -> &Level {
        &self.levels[(zoom - self.options.min_zoom) as usize]
    }

    /// Decode an id into a record that has children, i.e. one on
    /// `[min_zoom, max_zoom]` that exists.
    pub(crate) fn resolve(&self, id: u64) -> Result<(&Level, &ClusterRecord)> {
        let not_found = || ClusterError::ClusterNotFound(id);
        let (zoom, index) = ClusterId::from_raw(id).decode().ok_or_else(not_found)?;
        if zoom < self.options.min_zoom || zoom > self.options.max_zoom {
            return Err(not_found());
        }
        let level = self.level(zoom);
        let record = level.records.get(index as usize).ok_or_else(not_found)?;
        Ok((level, record))
    }

    /// Geographic position of a record.
    pub(crate) fn record_position(&self, record: &ClusterRecord) -> geo::Point<f64> {
        projection::unproject(geo::coord! { x: record.x, y: record.y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ClusterOptions {
        ClusterOptions::default().with_max_zoom(5)
    }

    #[test]
    fn test_empty_input() {
        let index = ClusterIndex::new(Vec::new(), options()).unwrap();
        assert!(index.is_empty());
        let stats = index.stats();
        assert_eq!(stats.levels.len(), 7);
        assert!(stats.levels.iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_level_layout() {
        let points = vec![PointFeature::new(1.0, 1.0), PointFeature::new(50.0, 50.0)];
        let index = ClusterIndex::new(points, options().with_min_zoom(2)).unwrap();
        let zooms: Vec<u8> = index.stats().levels.iter().map(|(z, _)| *z).collect();
        assert_eq!(zooms, vec![2, 3, 4, 5, 6]);
        assert_eq!(index.leaf_zoom(), 6);
        assert_eq!(index.level(6).records.len(), 2);
    }

    #[test]
    fn test_rejects_bad_options() {
        let err = ClusterIndex::new(Vec::new(), options().with_min_zoom(9)).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_non_finite_points() {
        let points = vec![PointFeature::new(0.0, f64::NAN)];
        assert!(ClusterIndex::new(points, options()).is_err());
    }

    #[test]
    fn test_resolve_rejects_leaf_level_and_garbage() {
        let points = vec![PointFeature::new(1.0, 1.0)];
        let index = ClusterIndex::new(points, options()).unwrap();
        assert!(index.resolve(ClusterId::new(0, 0).get()).is_ok());
        assert!(index.resolve(ClusterId::new(6, 0).get()).is_err());
        assert!(index.resolve(ClusterId::new(0, 1).get()).is_err());
        assert!(index.resolve(u64::MAX).is_err());
    }

    #[test]
    fn test_index_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClusterIndex>();
    }
}
