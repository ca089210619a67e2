//! GeoJSON input for the clustering engine.
//!
//! Only `Point` features with a two-number coordinate pair are accepted.

use crate::error::{ClusterError, Result};
use geocluster_types::point::{PointFeature, Properties};
use geojson::{Feature, FeatureCollection, GeoJson, Value};

/// Converts a GeoJSON feature into a clustering input point.
pub fn point_from_feature(feature: Feature) -> Result<PointFeature> {
    let Some(geometry) = feature.geometry else {
        return Err(ClusterError::InvalidInput(
            "Expected geometry object".to_string(),
        ));
    };

    match geometry.value {
        Value::Point(coords) => {
            if coords.len() != 2 {
                return Err(ClusterError::InvalidInput(
                    "Expected array of size 2 for coordinates".to_string(),
                ));
            }
            if !coords.iter().all(|c| c.is_finite()) {
                return Err(ClusterError::InvalidInput(
                    "Expected number for coordinates".to_string(),
                ));
            }
            let properties = feature.properties.unwrap_or_else(Properties::new);
            Ok(PointFeature::from_point(
                geo::Point::new(coords[0], coords[1]),
                properties,
            ))
        }
        _ => Err(ClusterError::InvalidInput(
            "Expected GeoJSON Feature object with type 'Point'".to_string(),
        )),
    }
}

/// Converts every feature of a collection, failing on the first bad one.
pub fn points_from_features<I>(features: I) -> Result<Vec<PointFeature>>
where
    I: IntoIterator<Item = Feature>,
{
    features
        .into_iter()
        .enumerate()
        .map(|(idx, f)| {
            point_from_feature(f).map_err(|e| {
                ClusterError::InvalidInput(format!("Feature at index {}: {}", idx, e))
            })
        })
        .collect()
}

/// Parses a FeatureCollection, or a bare JSON array of Features, into points.
pub fn points_from_value(value: serde_json::Value) -> Result<Vec<PointFeature>> {
    if let serde_json::Value::Array(items) = value {
        let features = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                serde_json::from_value::<Feature>(item).map_err(|e| {
                    ClusterError::InvalidInput(format!(
                        "Expected GeoJSON Feature object at index {}: {}",
                        idx, e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        return points_from_features(features);
    }

    match GeoJson::from_json_value(value) {
        Ok(GeoJson::FeatureCollection(FeatureCollection { features, .. })) => {
            points_from_features(features)
        }
        _ => Err(ClusterError::InvalidInput(
            "Expected array of GeoJSON Feature objects".to_string(),
        )),
    }
}

/// Parses a GeoJSON string into points. See [`points_from_value`].
pub fn points_from_geojson(geojson: &str) -> Result<Vec<PointFeature>> {
    let value: serde_json::Value = serde_json::from_str(geojson)
        .map_err(|e| ClusterError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;
    points_from_value(value)
}
