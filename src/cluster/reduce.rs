//! Property aggregation for clusters.
//!
//! While the hierarchy is built, every new cluster accumulates properties
//! from the records it absorbs: the seed's properties are mapped first, then
//! every merged neighbour is reduced into the result in visiting order.
//! Neighbours that are already clusters contribute their accumulated
//! properties, leaves contribute their mapped input properties.

use geocluster_types::point::Properties;
use serde_json::Value;

/// Map/reduce hooks for cluster properties.
///
/// # Examples
///
/// ```rust
/// use geocluster::{ClusterIndex, ClusterOptions, PointFeature, PropertySum};
///
/// let points = vec![
///     PointFeature::new(0.0, 0.0).with_property("beds", 3),
///     PointFeature::new(0.0001, 0.0001).with_property("beds", 5),
/// ];
/// let index = ClusterIndex::with_reducer(
///     points,
///     ClusterOptions::default(),
///     PropertySum::new(["beds"]),
/// )
/// .unwrap();
///
/// let clusters = index.get_clusters([-180.0, -90.0, 180.0, 90.0], 0).unwrap();
/// let props = clusters[0].properties.as_ref().unwrap();
/// assert_eq!(props["beds"], 8.0);
/// ```
pub trait PropertyReducer: Send + Sync {
    /// Initial cluster properties derived from one leaf's input properties.
    fn map(&self, properties: &Properties) -> Properties {
        properties.clone()
    }

    /// Fold `other` into `accumulated`.
    fn reduce(&self, accumulated: &mut Properties, other: &Properties);
}

/// Sums a fixed set of numeric properties. Missing or non-numeric values count as zero.
#[derive(Debug, Clone)]
pub struct PropertySum {
    fields: Vec<String>,
}

impl PropertySum {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

fn number(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

impl PropertyReducer for PropertySum {
    fn map(&self, properties: &Properties) -> Properties {
        self.fields
            .iter()
            .map(|field| (field.clone(), Value::from(number(properties.get(field)))))
            .collect()
    }

    fn reduce(&self, accumulated: &mut Properties, other: &Properties) {
        for field in &self.fields {
            let sum = number(accumulated.get(field)) + number(other.get(field));
            accumulated.insert(field.clone(), Value::from(sum));
        }
    }
}
