//! Tile, bounding-box and hierarchy queries.

use super::{ClusterIndex, Level};
use crate::compute::projection::{lat_y, lng_x};
use crate::compute::validation::validate_bounds;
use crate::error::Result;
use geocluster_types::bbox::GeoBounds;
use geocluster_types::tile::TileFeature;
use geojson::Feature;
use rustc_hash::FxHashSet;

/// Wrap a longitude into `[-180, 180)`.
fn wrap_lng(lng: f64) -> f64 {
    ((lng + 180.0) % 360.0 + 360.0) % 360.0 - 180.0
}

impl ClusterIndex {
    /// Points and clusters of tile `z/x/y` in tile-local integer pixels.
    ///
    /// Clustering data comes from zoom `z` clamped to the built range (the leaf
    /// level counts), while the tile geometry always follows the requested `z`.
    /// The tile is padded by one cluster radius so markers near an edge show
    /// up in both neighbouring tiles, and the first and last tile columns also
    /// pick up records just across the antimeridian.
    pub fn get_tile(&self, z: u8, x: u32, y: u32) -> Result<Vec<TileFeature>> {
        let level = self.level(self.options.limit_zoom(z as i32));
        let z2 = 2f64.powi(z as i32);
        let extent = self.options.extent as f64;
        let r = self.options.radius as f64 / extent;
        let (xf, yf) = (x as f64, y as f64);

        let top = (yf - r) / z2;
        let bottom = (yf + 1.0 + r) / z2;

        let mut features = Vec::new();
        let mut push = |ids: Vec<u32>, tile_x: f64| {
            for i in ids {
                let rec = &level.records[i as usize];
                let px = (extent * (rec.x * z2 - tile_x)).round() as i64;
                let py = (extent * (rec.y * z2 - yf)).round() as i64;
                features.push(self.tile_feature(level, i, px, py));
            }
        };

        push(
            level.index.range((xf - r) / z2, top, (xf + 1.0 + r) / z2, bottom),
            xf,
        );
        if x == 0 {
            push(level.index.range(1.0 - r / z2, top, 1.0, bottom), z2);
        }
        if xf == z2 - 1.0 {
            push(level.index.range(0.0, top, r / z2, bottom), -1.0);
        }

        Ok(features)
    }

    /// Points and clusters inside `bbox = [west, south, east, north]` at `zoom`.
    ///
    /// A window whose western edge is east of its eastern edge crosses the
    /// antimeridian and is answered as two halves. A window spanning 360
    /// degrees or more of longitude covers the whole world.
    pub fn get_clusters<B: Into<GeoBounds>>(&self, bbox: B, zoom: i32) -> Result<Vec<Feature>> {
        let bounds = bbox.into();
        validate_bounds(&bounds)?;

        let level = self.level(self.options.limit_zoom(zoom));
        let south = bounds.south.clamp(-90.0, 90.0);
        let north = bounds.north.clamp(-90.0, 90.0);

        let (west, east) = if bounds.east - bounds.west >= 360.0 {
            (-180.0, 180.0)
        } else {
            let east = if bounds.east == 180.0 {
                180.0
            } else {
                wrap_lng(bounds.east)
            };
            (wrap_lng(bounds.west), east)
        };

        let normalized = GeoBounds::new(west, south, east, north);
        let Some((western, eastern)) = normalized.split_antimeridian() else {
            return Ok(self.features_in(level, &normalized, &mut FxHashSet::default()));
        };

        let mut seen = FxHashSet::default();
        let mut features = self.features_in(level, &western, &mut seen);
        features.extend(self.features_in(level, &eastern, &mut seen));
        Ok(features)
    }

    fn features_in(
        &self,
        level: &Level,
        bounds: &GeoBounds,
        seen: &mut FxHashSet<u32>,
    ) -> Vec<Feature> {
        level
            .index
            .range(
                lng_x(bounds.west),
                lat_y(bounds.north),
                lng_x(bounds.east),
                lat_y(bounds.south),
            )
            .into_iter()
            .filter(|i| seen.insert(*i))
            .map(|i| self.geo_feature(level, i))
            .collect()
    }

    /// Immediate children of a cluster, one zoom level finer.
    pub fn get_children(&self, cluster_id: u64) -> Result<Vec<Feature>> {
        let (level, record) = self.resolve(cluster_id)?;
        let finer = self.level(level.zoom + 1);
        Ok(level
            .children_of(record)
            .iter()
            .map(|&c| self.geo_feature(finer, c))
            .collect())
    }

    /// Original points below a cluster, depth first in build order.
    ///
    /// Skips the first `offset` points and returns at most `limit` of the
    /// rest. An offset past the end yields an empty list.
    pub fn get_leaves(
        &self,
        cluster_id: u64,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Feature>> {
        let (level, record) = self.resolve(cluster_id)?;
        let mut leaves = Vec::new();
        if limit == 0 || offset >= record.num_points as usize {
            return Ok(leaves);
        }

        let mut skipped = 0usize;
        self.append_leaves(
            level,
            level.children_of(record),
            limit,
            offset,
            &mut skipped,
            &mut leaves,
        );
        Ok(leaves)
    }

    fn append_leaves(
        &self,
        level: &Level,
        children: &[u32],
        limit: usize,
        offset: usize,
        skipped: &mut usize,
        out: &mut Vec<Feature>,
    ) {
        let finer = self.level(level.zoom + 1);
        let at_leaves = finer.zoom == self.leaf_zoom();

        for &c in children {
            if out.len() >= limit {
                return;
            }
            let child = &finer.records[c as usize];
            let count = child.num_points as usize;

            if *skipped + count <= offset {
                *skipped += count;
            } else if at_leaves {
                out.push(self.geo_feature(finer, c));
            } else {
                self.append_leaves(finer, finer.children_of(child), limit, offset, skipped, out);
            }
        }
    }

    /// Zoom at which a cluster first shows more than one child.
    ///
    /// Follows single-child chains toward finer zooms. A cluster that only
    /// separates on the leaf level yields `max_zoom + 1`.
    pub fn get_cluster_expansion_zoom(&self, cluster_id: u64) -> Result<u8> {
        let (mut level, mut record) = self.resolve(cluster_id)?;
        let mut zoom = level.zoom;

        while zoom <= self.options.max_zoom {
            let children = level.children_of(record);
            zoom += 1;
            if children.len() != 1 {
                break;
            }
            let finer = self.level(zoom);
            record = &finer.records[children[0] as usize];
            level = finer;
        }

        Ok(zoom)
    }
}
