//! Conversion of cluster records into output features.
//!
//! A cluster is marked by `cluster: true` and carries `cluster_id`,
//! `point_count` and `point_count_abbreviated` on top of any reduced
//! properties. A single point carries exactly its input properties.

use super::{ClusterId, ClusterIndex, ClusterRecord, Level};
use geocluster_types::point::Properties;
use geocluster_types::tile::TileFeature;
use geojson::{Feature, Geometry, Value, feature::Id};
use serde_json::Number;

/// Short human-readable point count: `"950"`, `"1.2k"`, `"15k"`.
///
/// ```
/// use geocluster::abbreviate_count;
///
/// assert_eq!(abbreviate_count(999), "999");
/// assert_eq!(abbreviate_count(1234), "1.2k");
/// assert_eq!(abbreviate_count(15_400), "15k");
/// ```
pub fn abbreviate_count(count: u32) -> String {
    if count >= 10_000 {
        format!("{}k", (count as f64 / 1000.0).round())
    } else if count >= 1000 {
        format!("{}k", (count as f64 / 100.0).round() / 10.0)
    } else {
        count.to_string()
    }
}

impl ClusterIndex {
    /// Properties exposed for the record at `level.records[index]`.
    pub(crate) fn record_properties(
        &self,
        level: &Level,
        index: u32,
        record: &ClusterRecord,
    ) -> Properties {
        if !record.is_cluster() {
            return self.points[record.point as usize].properties.clone();
        }

        let mut props = record
            .properties
            .as_deref()
            .cloned()
            .unwrap_or_default();
        props.insert("cluster".into(), true.into());
        props.insert(
            "cluster_id".into(),
            ClusterId::new(level.zoom, index).get().into(),
        );
        props.insert("point_count".into(), record.num_points.into());
        props.insert(
            "point_count_abbreviated".into(),
            abbreviate_count(record.num_points).into(),
        );
        props
    }

    /// Feature id: the cluster id for clusters, the input position for
    /// points when `generate_id` is set.
    pub(crate) fn record_id(
        &self,
        level: &Level,
        index: u32,
        record: &ClusterRecord,
    ) -> Option<u64> {
        if record.is_cluster() {
            Some(ClusterId::new(level.zoom, index).get())
        } else if self.options.generate_id {
            Some(record.point as u64)
        } else {
            None
        }
    }

    /// GeoJSON feature at full geographic precision.
    pub(crate) fn geo_feature(&self, level: &Level, index: u32) -> Feature {
        let record = &level.records[index as usize];
        let position = self.record_position(record);
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![position.x(), position.y()]))),
            id: self
                .record_id(level, index, record)
                .map(|id| Id::Number(Number::from(id))),
            properties: Some(self.record_properties(level, index, record)),
            foreign_members: None,
        }
    }

    /// Tile feature at integer pixel position.
    pub(crate) fn tile_feature(
        &self,
        level: &Level,
        index: u32,
        px: i64,
        py: i64,
    ) -> TileFeature {
        let record = &level.records[index as usize];
        TileFeature::point(
            px,
            py,
            self.record_properties(level, index, record),
            self.record_id(level, index, record),
        )
    }
}

/// `point_count` of an output feature: the cluster's count, or 1 for a point.
pub fn feature_point_count(feature: &Feature) -> u64 {
    feature
        .property("point_count")
        .and_then(|v| v.as_u64())
        .unwrap_or(1)
}

/// `cluster_id` of an output feature, if it is a cluster.
pub fn feature_cluster_id(feature: &Feature) -> Option<u64> {
    feature.property("cluster_id").and_then(|v| v.as_u64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusterOptions;
    use geocluster_types::point::PointFeature;

    #[test]
    fn test_abbreviate_count() {
        assert_eq!(abbreviate_count(1), "1");
        assert_eq!(abbreviate_count(999), "999");
        assert_eq!(abbreviate_count(1000), "1k");
        assert_eq!(abbreviate_count(1049), "1k");
        assert_eq!(abbreviate_count(1050), "1.1k");
        assert_eq!(abbreviate_count(9_949), "9.9k");
        assert_eq!(abbreviate_count(10_000), "10k");
        assert_eq!(abbreviate_count(123_456), "123k");
    }

    #[test]
    fn test_cluster_and_point_features() {
        let points = vec![
            PointFeature::new(0.0, 0.0).with_property("name", "a"),
            PointFeature::new(0.0001, 0.0001).with_property("name", "b"),
        ];
        let index = ClusterIndex::new(points, ClusterOptions::default()).unwrap();

        let top = index.level(0);
        let cluster = index.geo_feature(top, 0);
        let props = cluster.properties.as_ref().unwrap();
        assert_eq!(props["cluster"], true);
        assert_eq!(props["point_count"], 2);
        assert_eq!(props["point_count_abbreviated"], "2");
        assert_eq!(feature_point_count(&cluster), 2);
        assert_eq!(
            cluster.id,
            Some(Id::Number(Number::from(ClusterId::new(0, 0).get())))
        );
        assert_eq!(feature_cluster_id(&cluster), Some(ClusterId::new(0, 0).get()));

        let leaves = index.level(17);
        let leaf = index.geo_feature(leaves, 1);
        assert_eq!(leaf.property("name").unwrap(), "b");
        assert!(leaf.property("cluster").is_none());
        assert!(leaf.id.is_none());
        assert_eq!(feature_point_count(&leaf), 1);
    }

    #[test]
    fn test_generated_ids() {
        let points = vec![PointFeature::new(-50.0, 0.0), PointFeature::new(50.0, 0.0)];
        let index =
            ClusterIndex::new(points, ClusterOptions::default().with_generate_id(true)).unwrap();
        let leaves = index.level(17);
        let f = index.tile_feature(leaves, 1, 3, 4);
        assert_eq!(f.id, Some(1));
        assert_eq!(f.position(), Some([3, 4]));
        assert!(!f.is_cluster());
    }
}
