//! Immutable point index over one zoom level of cluster records.
//!
//! Each level is bulk-loaded once into an R-tree (`rstar` STR packing,
//! `O(n log n)`) and never modified afterwards, so queries can run from any
//! number of threads without locking.
//!
//! Results are returned as positions into the level's record array, sorted
//! ascending. Tree traversal order depends on the packing, so sorting is what
//! keeps clustering and query output reproducible and makes records with
//! identical coordinates come back in their original array order.

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use smallvec::SmallVec;

/// Projected position tagged with its array position.
type Entry = GeomWithData<[f64; 2], u32>;

/// Neighbour list returned by radius queries; most lookups return a handful.
pub type Neighbors = SmallVec<[u32; 16]>;

/// Bulk-loaded spatial index over the projected coordinates of one level.
#[derive(Clone)]
pub struct LevelIndex {
    tree: RTree<Entry>,
}

impl std::fmt::Debug for LevelIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelIndex")
            .field("len", &self.tree.size())
            .finish()
    }
}

impl LevelIndex {
    /// Build an index from projected coordinates in array order.
    pub fn bulk_load<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = [f64; 2]>,
    {
        let entries: Vec<Entry> = coords
            .into_iter()
            .enumerate()
            .map(|(i, xy)| GeomWithData::new(xy, i as u32))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All positions within euclidean distance `radius` of `(x, y)`, inclusive.
    pub fn within(&self, x: f64, y: f64, radius: f64) -> Neighbors {
        if !(x.is_finite() && y.is_finite() && radius.is_finite()) {
            log::warn!("Rejecting radius query with non-finite coordinates");
            return Neighbors::new();
        }

        let mut found: Neighbors = self
            .tree
            .locate_within_distance([x, y], radius * radius)
            .map(|entry| entry.data)
            .collect();
        found.sort_unstable();
        found
    }

    /// All positions inside the axis-aligned box, bounds inclusive.
    pub fn range(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<u32> {
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            log::warn!("Rejecting bounding box query with non-finite coordinates");
            return Vec::new();
        }
        if min_x > max_x || min_y > max_y {
            return Vec::new();
        }

        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut found: Vec<u32> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|entry| entry.data)
            .collect();
        found.sort_unstable();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> LevelIndex {
        let mut coords = Vec::new();
        for i in 0..n {
            for j in 0..n {
                coords.push([i as f64 / n as f64, j as f64 / n as f64]);
            }
        }
        LevelIndex::bulk_load(coords)
    }

    #[test]
    fn test_empty_index() {
        let index = LevelIndex::bulk_load(Vec::new());
        assert!(index.is_empty());
        assert!(index.within(0.5, 0.5, 1.0).is_empty());
        assert!(index.range(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_range_is_inclusive_and_sorted() {
        let index = grid(10);
        assert_eq!(index.len(), 100);

        let found = index.range(0.0, 0.0, 0.1, 0.1);
        assert_eq!(found, vec![0, 1, 10, 11]);

        let all = index.range(0.0, 0.0, 1.0, 1.0);
        assert_eq!(all.len(), 100);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_range_inverted_box_is_empty() {
        let index = grid(4);
        assert!(index.range(0.5, 0.0, 0.1, 1.0).is_empty());
    }

    #[test]
    fn test_within_radius() {
        let index = grid(10);
        // (0.5, 0.5) is entry 55; its four axis neighbours sit exactly 0.1 away.
        let found = index.within(0.5, 0.5, 0.1);
        assert_eq!(found.as_slice(), &[45, 54, 55, 56, 65]);
    }

    #[test]
    fn test_duplicates_keep_array_order() {
        let index = LevelIndex::bulk_load(vec![[0.3, 0.3]; 40]);
        let found = index.within(0.3, 0.3, 0.0);
        let expected: Vec<u32> = (0..40).collect();
        assert_eq!(found.to_vec(), expected);
    }

    #[test]
    fn test_non_finite_queries_are_rejected() {
        let index = grid(3);
        assert!(index.within(f64::NAN, 0.0, 1.0).is_empty());
        assert!(index.range(0.0, f64::INFINITY, 1.0, 1.0).is_empty());
    }
}
