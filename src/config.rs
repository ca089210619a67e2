//! Clustering configuration.
//!
//! `ClusterOptions` is validated once when an index is built; queries never
//! look at raw option values again.

use crate::error::{ClusterError, Result};
use serde::de::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highest supported `max_zoom`. Cluster ids reserve five bits for the zoom
/// of the level a record lives on, and the leaf level sits at `max_zoom + 1`.
pub const MAX_SUPPORTED_ZOOM: u8 = 30;

/// Options controlling how points are merged into clusters.
///
/// # Example
///
/// ```rust
/// use geocluster::ClusterOptions;
///
/// let options = ClusterOptions::default().with_radius(60).with_max_zoom(14);
/// assert!(options.validate().is_ok());
///
/// let json = r#"{ "radius": 80, "minPoints": 3 }"#;
/// let options = ClusterOptions::from_json(json).unwrap();
/// assert_eq!(options.radius, 80);
/// assert_eq!(options.max_zoom, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterOptions {
    /// Cluster radius in pixels at `extent` tile size
    pub radius: u32,
    /// Coarsest zoom level at which clusters are generated
    pub min_zoom: u8,
    /// Finest zoom level at which clusters are generated
    pub max_zoom: u8,
    /// Tile extent in pixels; the radius is interpreted relative to it
    pub extent: u32,
    /// Minimum combined point count needed to form a cluster
    pub min_points: u32,
    /// Attach the input position as an id to every leaf feature
    pub generate_id: bool,
}

impl ClusterOptions {
    const DEFAULT_RADIUS: u32 = 40;
    const DEFAULT_MIN_ZOOM: u8 = 0;
    const DEFAULT_MAX_ZOOM: u8 = 16;
    const DEFAULT_EXTENT: u32 = 512;
    const DEFAULT_MIN_POINTS: u32 = 2;

    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_min_zoom(mut self, min_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_extent(mut self, extent: u32) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_min_points(mut self, min_points: u32) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_generate_id(mut self, generate_id: bool) -> Self {
        self.generate_id = generate_id;
        self
    }

    /// Merge radius at zoom `z` in normalized projected units.
    pub fn radius_at(&self, zoom: u8) -> f64 {
        self.radius as f64 / (self.extent as f64 * 2f64.powi(zoom as i32))
    }

    /// Clamp a requested zoom into `[min_zoom, max_zoom + 1]`.
    ///
    /// The upper bound is the leaf level, which holds one record per input point.
    pub fn limit_zoom(&self, zoom: i32) -> u8 {
        zoom.clamp(self.min_zoom as i32, self.max_zoom as i32 + 1) as u8
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.min_zoom > self.max_zoom {
            return Err(format!(
                "minZoom ({}) must be <= maxZoom ({})",
                self.min_zoom, self.max_zoom
            ));
        }
        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(format!(
                "maxZoom must be <= {}, got {}",
                MAX_SUPPORTED_ZOOM, self.max_zoom
            ));
        }
        if self.extent == 0 {
            return Err("extent must be greater than zero".to_string());
        }
        if self.min_points == 0 {
            return Err("minPoints must be at least 1".to_string());
        }
        Ok(())
    }

    /// Build options from a loosely typed host object.
    ///
    /// Absent fields keep their defaults. A field that is present with the
    /// wrong type is rejected; numbers are truncated toward zero.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(obj) = value.as_object() else {
            return Err(ClusterError::InvalidInput(
                "Expected object for options".into(),
            ));
        };

        let mut options = Self::default();
        if let Some(v) = number_field(obj, "radius")? {
            options.radius = non_negative(v, "radius")?;
        }
        if let Some(v) = number_field(obj, "minZoom")? {
            options.min_zoom = zoom_value(v, "minZoom")?;
        }
        if let Some(v) = number_field(obj, "maxZoom")? {
            options.max_zoom = zoom_value(v, "maxZoom")?;
        }
        if let Some(v) = number_field(obj, "extent")? {
            options.extent = non_negative(v, "extent")?;
        }
        if let Some(v) = number_field(obj, "minPoints")? {
            options.min_points = non_negative(v, "minPoints")?;
        }
        if let Some(v) = obj.get("generateId") {
            options.generate_id = v.as_bool().ok_or_else(|| {
                ClusterError::InvalidInput("Expected boolean for generateId".into())
            })?;
        }

        options.validate().map_err(ClusterError::InvalidInput)?;
        Ok(options)
    }

    /// Load options from a JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let options: ClusterOptions = serde_json::from_str(json)?;
        if let Err(e) = options.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(options)
    }

    /// Save options as a JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load options from a TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let options: ClusterOptions = toml::from_str(toml_str)?;
        if let Err(e) = options.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(options)
    }

    /// Save options as a TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            min_zoom: Self::DEFAULT_MIN_ZOOM,
            max_zoom: Self::DEFAULT_MAX_ZOOM,
            extent: Self::DEFAULT_EXTENT,
            min_points: Self::DEFAULT_MIN_POINTS,
            generate_id: false,
        }
    }
}

fn number_field(obj: &serde_json::Map<String, Value>, name: &str) -> Result<Option<f64>> {
    match obj.get(name) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .filter(|n| n.is_finite())
            .map(|n| Some(n.trunc()))
            .ok_or_else(|| ClusterError::InvalidInput(format!("Expected number for {}", name))),
    }
}

fn non_negative(value: f64, name: &str) -> Result<u32> {
    if value < 0.0 || value > u32::MAX as f64 {
        return Err(ClusterError::InvalidInput(format!(
            "{} out of range: {}",
            name, value
        )));
    }
    Ok(value as u32)
}

fn zoom_value(value: f64, name: &str) -> Result<u8> {
    if !(0.0..=MAX_SUPPORTED_ZOOM as f64).contains(&value) {
        return Err(ClusterError::InvalidInput(format!(
            "{} must be within [0, {}], got {}",
            name, MAX_SUPPORTED_ZOOM, value
        )));
    }
    Ok(value as u8)
}
