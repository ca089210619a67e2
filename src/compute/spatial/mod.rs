//! Spatial indexing for cluster levels.

pub mod level_index;

pub use level_index::LevelIndex;
