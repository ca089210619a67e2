//! Named cluster sessions.
//!
//! The registry is an explicit ownership table mapping names to built
//! indexes. Indexes are handed out as `Arc`s: a query that already holds a
//! session keeps it alive even if the name is destroyed concurrently, while
//! every lookup after the destroy fails with `SessionNotFound`.

use crate::cluster::{ClusterIndex, PropertyReducer};
use crate::compute::geojson::points_from_geojson;
use crate::config::ClusterOptions;
use crate::error::{ClusterError, Result};
use geocluster_types::bbox::GeoBounds;
use geocluster_types::point::PointFeature;
use geocluster_types::tile::TileFeature;
use geojson::Feature;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A validated session name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionName(String);

impl SessionName {
    /// Parses and validates a string as a session name.
    ///
    /// Names must be non-empty, at most 255 bytes and free of null bytes
    /// (they cross the C boundary as C strings).
    pub fn parse<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(ClusterError::InvalidInput(
                "Session name cannot be empty".into(),
            ));
        }

        if name.contains('\0') {
            return Err(ClusterError::InvalidInput(
                "Session name cannot contain null bytes".into(),
            ));
        }

        if name.len() > 255 {
            return Err(ClusterError::InvalidInput(
                "Session name cannot exceed 255 characters".into(),
            ));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Thread-safe table of named clustering sessions.
///
/// # Examples
///
/// ```rust
/// use geocluster::{ClusterOptions, ClusterRegistry, PointFeature};
///
/// let registry = ClusterRegistry::new();
/// registry.build(
///     "cafes",
///     vec![PointFeature::new(2.35, 48.85), PointFeature::new(2.36, 48.86)],
///     ClusterOptions::default(),
/// )?;
///
/// let clusters = registry.get_clusters("cafes", [-180.0, -90.0, 180.0, 90.0], 2)?;
/// assert_eq!(clusters.len(), 1);
///
/// registry.destroy("cafes")?;
/// assert!(registry.get_clusters("cafes", [-180.0, -90.0, 180.0, 90.0], 2).is_err());
/// # Ok::<(), geocluster::ClusterError>(())
/// ```
#[derive(Debug, Default)]
pub struct ClusterRegistry {
    sessions: RwLock<FxHashMap<String, Arc<ClusterIndex>>>,
}

impl ClusterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index and register it under `name`, replacing any previous
    /// session of that name. Nothing is registered if the build fails.
    pub fn build<S: Into<String>>(
        &self,
        name: S,
        points: Vec<PointFeature>,
        options: ClusterOptions,
    ) -> Result<Arc<ClusterIndex>> {
        let name = SessionName::parse(name)?;
        let index = ClusterIndex::new(points, options)?;
        Ok(self.insert(name, index))
    }

    /// Like [`ClusterRegistry::build`], accumulating cluster properties with `reducer`.
    pub fn build_with_reducer<S, R>(
        &self,
        name: S,
        points: Vec<PointFeature>,
        options: ClusterOptions,
        reducer: R,
    ) -> Result<Arc<ClusterIndex>>
    where
        S: Into<String>,
        R: PropertyReducer,
    {
        let name = SessionName::parse(name)?;
        let index = ClusterIndex::with_reducer(points, options, reducer)?;
        Ok(self.insert(name, index))
    }

    /// Build from GeoJSON text: a FeatureCollection or an array of Point
    /// features, plus an optional JSON options object using the host names
    /// (`radius`, `minZoom`, `maxZoom`, `extent`, `minPoints`, `generateId`).
    pub fn load_geojson<S: Into<String>>(
        &self,
        name: S,
        features_json: &str,
        options_json: Option<&str>,
    ) -> Result<Arc<ClusterIndex>> {
        let options = match options_json {
            Some(json) => ClusterOptions::from_value(&serde_json::from_str(json)?)?,
            None => ClusterOptions::default(),
        };
        let points = points_from_geojson(features_json)?;
        self.build(name, points, options)
    }

    /// Register an already built index.
    pub fn insert(&self, name: SessionName, index: ClusterIndex) -> Arc<ClusterIndex> {
        let index = Arc::new(index);
        let replaced = self
            .sessions
            .write()
            .insert(name.0.clone(), Arc::clone(&index))
            .is_some();
        log::info!(
            "{} cluster session '{}' ({} points)",
            if replaced { "Replaced" } else { "Registered" },
            name,
            index.len()
        );
        index
    }

    /// Shared handle to a registered session.
    pub fn session(&self, name: &str) -> Result<Arc<ClusterIndex>> {
        self.sessions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::SessionNotFound(name.to_string()))
    }

    pub fn get_tile(&self, name: &str, z: u8, x: u32, y: u32) -> Result<Vec<TileFeature>> {
        self.session(name)?.get_tile(z, x, y)
    }

    pub fn get_clusters<B: Into<GeoBounds>>(
        &self,
        name: &str,
        bbox: B,
        zoom: i32,
    ) -> Result<Vec<Feature>> {
        self.session(name)?.get_clusters(bbox, zoom)
    }

    pub fn get_children(&self, name: &str, cluster_id: u64) -> Result<Vec<Feature>> {
        self.session(name)?.get_children(cluster_id)
    }

    pub fn get_leaves(
        &self,
        name: &str,
        cluster_id: u64,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Feature>> {
        self.session(name)?.get_leaves(cluster_id, limit, offset)
    }

    pub fn get_cluster_expansion_zoom(&self, name: &str, cluster_id: u64) -> Result<u8> {
        self.session(name)?.get_cluster_expansion_zoom(cluster_id)
    }

    /// Remove a session. Handles obtained earlier stay valid until dropped.
    pub fn destroy(&self, name: &str) -> Result<()> {
        match self.sessions.write().remove(name) {
            Some(_) => {
                log::info!("Destroyed cluster session '{}'", name);
                Ok(())
            }
            None => Err(ClusterError::SessionNotFound(name.to_string())),
        }
    }

    /// Remove every session.
    pub fn destroy_all(&self) {
        let mut sessions = self.sessions.write();
        let count = sessions.len();
        sessions.clear();
        log::info!("Destroyed {} cluster sessions", count);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sessions.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sessions.read().keys().cloned().collect();
        names.sort();
        names
    }
}
