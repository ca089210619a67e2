use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form properties attached to a feature.
pub type Properties = serde_json::Map<String, Value>;

/// An input point for clustering: a longitude/latitude pair plus its properties.
///
/// Points carry no identifier of their own. The clustering engine can
/// synthesize one from the input position when asked to.
///
/// # Examples
///
/// ```
/// use geocluster_types::point::PointFeature;
///
/// let cafe = PointFeature::new(2.3522, 48.8566).with_property("kind", "cafe");
/// assert_eq!(cafe.lat(), 48.8566);
/// assert_eq!(cafe.properties["kind"], "cafe");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointFeature {
    /// Geographic position (x = longitude, y = latitude)
    pub point: Point<f64>,
    /// Arbitrary properties copied through to leaf output
    #[serde(default)]
    pub properties: Properties,
}

impl PointFeature {
    /// Create a point feature without properties.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            point: Point::new(lon, lat),
            properties: Properties::new(),
        }
    }

    /// Create a point feature from a `geo::Point` and a property map.
    pub fn from_point(point: Point<f64>, properties: Properties) -> Self {
        Self { point, properties }
    }

    /// Add a single property, replacing any previous value under `key`.
    pub fn with_property<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    /// True if both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lon().is_finite() && self.lat().is_finite()
    }
}

impl From<Point<f64>> for PointFeature {
    fn from(point: Point<f64>) -> Self {
        Self::from_point(point, Properties::new())
    }
}
