use geo::{Rect, coord};
use serde::{Deserialize, Serialize};

/// A longitude/latitude window `[west, south, east, north]`.
///
/// Unlike `geo::Rect`, the western edge may be greater than the eastern
/// edge, which denotes a window crossing the antimeridian.
///
/// # Examples
///
/// ```
/// use geocluster_types::bbox::GeoBounds;
///
/// let pacific = GeoBounds::new(170.0, -10.0, -170.0, 10.0);
/// assert!(pacific.crosses_antimeridian());
/// let (west, east) = pacific.split_antimeridian().unwrap();
/// assert_eq!(west.to_array(), [170.0, -10.0, 180.0, 10.0]);
/// assert_eq!(east.to_array(), [-180.0, -10.0, -170.0, 10.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// The whole world.
    pub fn world() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    pub fn from_array(bbox: [f64; 4]) -> Self {
        Self::new(bbox[0], bbox[1], bbox[2], bbox[3])
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Split an antimeridian-crossing window into `[west, 180]` and `[-180, east]`.
    ///
    /// Returns `None` for a window that does not cross.
    pub fn split_antimeridian(&self) -> Option<(GeoBounds, GeoBounds)> {
        if !self.crosses_antimeridian() {
            return None;
        }
        Some((
            GeoBounds::new(self.west, self.south, 180.0, self.north),
            GeoBounds::new(-180.0, self.south, self.east, self.north),
        ))
    }

    /// Convert to a `geo::Rect`. Only meaningful when the window does not cross.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.west, y: self.south },
            coord! { x: self.east, y: self.north },
        )
    }
}

impl From<[f64; 4]> for GeoBounds {
    fn from(bbox: [f64; 4]) -> Self {
        Self::from_array(bbox)
    }
}
