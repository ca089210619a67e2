use crate::point::Properties;
use serde::{Deserialize, Serialize};

/// Address of a square tile in the projected plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one axis at this zoom (`2^z`).
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.z
    }

    /// Whether `x` and `y` address a tile that exists at this zoom.
    pub fn is_valid(&self) -> bool {
        let n = self.tiles_per_axis();
        (self.x as u64) < n && (self.y as u64) < n
    }
}

/// A point or cluster positioned in tile-local pixel space.
///
/// The layout follows the point-feature shape used by vector tile
/// encoders: `type` is always 1 (point), `geometry` holds a single
/// `[x, y]` pair in integer pixels, and `tags` carries the properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileFeature {
    #[serde(rename = "type")]
    pub kind: u8,
    pub geometry: Vec<[i64; 2]>,
    pub tags: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl TileFeature {
    /// Feature type code of a point.
    pub const POINT: u8 = 1;

    pub fn point(x: i64, y: i64, tags: Properties, id: Option<u64>) -> Self {
        Self {
            kind: Self::POINT,
            geometry: vec![[x, y]],
            tags,
            id,
        }
    }

    /// Pixel position of the feature.
    pub fn position(&self) -> Option<[i64; 2]> {
        self.geometry.first().copied()
    }

    /// True if the tags mark this feature as a cluster.
    pub fn is_cluster(&self) -> bool {
        self.tags
            .get("cluster")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_validity() {
        assert!(TileCoord::new(0, 0, 0).is_valid());
        assert!(!TileCoord::new(0, 1, 0).is_valid());
        assert!(TileCoord::new(3, 7, 7).is_valid());
        assert!(!TileCoord::new(3, 8, 0).is_valid());
    }

    #[test]
    fn test_tile_feature_json_shape() {
        let f = TileFeature::point(10, 20, Properties::new(), None);
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["type"], 1);
        assert_eq!(json["geometry"], serde_json::json!([[10, 20]]));
        assert!(json.get("id").is_none());
        assert!(!f.is_cluster());
    }
}
