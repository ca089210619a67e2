use geocluster::{
    ClusterId, ClusterIndex, ClusterOptions, Feature, PointFeature, PropertySum,
    feature_cluster_id, feature_point_count,
};
use std::collections::BTreeSet;

const WORLD: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];

/// Deterministic scatter: a few dense groups plus a loose background.
fn scattered_points(n: usize) -> Vec<PointFeature> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let centers = [(-74.0, 40.7), (2.35, 48.85), (139.7, 35.7), (-43.2, -22.9)];
    (0..n)
        .map(|i| {
            let (lng, lat) = if i % 5 == 0 {
                (next() * 340.0 - 170.0, next() * 150.0 - 75.0)
            } else {
                let (cx, cy) = centers[i % centers.len()];
                (cx + (next() - 0.5) * 4.0, cy + (next() - 0.5) * 4.0)
            };
            PointFeature::new(lng, lat).with_property("i", i as u64)
        })
        .collect()
}

fn leaf_index(feature: &Feature) -> u64 {
    feature
        .property("i")
        .and_then(|v| v.as_u64())
        .expect("leaf carries its input index")
}

fn build(n: usize) -> ClusterIndex {
    ClusterIndex::new(scattered_points(n), ClusterOptions::default().with_max_zoom(10))
        .expect("Failed to build index")
}

#[test]
fn test_every_zoom_accounts_for_every_point() {
    let index = build(500);

    for zoom in 0..=11 {
        let features = index.get_clusters(WORLD, zoom).unwrap();
        let total: u64 = features.iter().map(feature_point_count).sum();
        assert_eq!(total, 500, "zoom {}", zoom);
    }
}

#[test]
fn test_cluster_count_never_decreases_with_zoom() {
    let index = build(500);

    let mut previous = 0;
    for zoom in 0..=11 {
        let count = index.get_clusters(WORLD, zoom).unwrap().len();
        assert!(count >= previous, "zoom {} has {} < {}", zoom, count, previous);
        previous = count;
    }
}

#[test]
fn test_leaf_level_shows_every_point_once() {
    let index = build(300);

    let features = index.get_clusters(WORLD, 11).unwrap();
    assert_eq!(features.len(), 300);
    assert!(features.iter().all(|f| feature_cluster_id(f).is_none()));

    let seen: BTreeSet<u64> = features.iter().map(leaf_index).collect();
    assert_eq!(seen.len(), 300);

    // Zooms past the leaf level are clamped to it.
    assert_eq!(index.get_clusters(WORLD, 25).unwrap().len(), 300);
}

#[test]
fn test_children_sum_to_parent() {
    let index = build(400);

    for zoom in 0..=10 {
        for feature in index.get_clusters(WORLD, zoom).unwrap() {
            let Some(id) = feature_cluster_id(&feature) else {
                continue;
            };
            let children = index.get_children(id).unwrap();
            assert!(!children.is_empty());
            let sum: u64 = children.iter().map(feature_point_count).sum();
            assert_eq!(sum, feature_point_count(&feature), "cluster {}", id);

            for child in &children {
                if let Some(child_id) = feature_cluster_id(child) {
                    assert_eq!(ClusterId::from_raw(child_id).zoom(), zoom as u8 + 1);
                }
            }
        }
    }
}

#[test]
fn test_leaves_match_point_count() {
    let index = build(400);

    for zoom in [0, 3, 7] {
        for feature in index.get_clusters(WORLD, zoom).unwrap() {
            let Some(id) = feature_cluster_id(&feature) else {
                continue;
            };
            let leaves = index.get_leaves(id, usize::MAX, 0).unwrap();
            assert_eq!(leaves.len() as u64, feature_point_count(&feature));

            let unique: BTreeSet<u64> = leaves.iter().map(leaf_index).collect();
            assert_eq!(unique.len(), leaves.len());

            let again = index.get_leaves(id, usize::MAX, 0).unwrap();
            assert_eq!(leaves, again);
        }
    }
}

#[test]
fn test_leaf_pagination_concatenates() {
    let index = build(400);
    let biggest = index
        .get_clusters(WORLD, 0)
        .unwrap()
        .into_iter()
        .max_by_key(feature_point_count)
        .unwrap();
    let id = feature_cluster_id(&biggest).unwrap();

    let all: Vec<u64> = index
        .get_leaves(id, usize::MAX, 0)
        .unwrap()
        .iter()
        .map(leaf_index)
        .collect();

    for page_size in [1, 7, 10, 64] {
        let mut paged = Vec::new();
        let mut offset = 0;
        loop {
            let page = index.get_leaves(id, page_size, offset).unwrap();
            if page.is_empty() {
                break;
            }
            assert!(page.len() <= page_size);
            paged.extend(page.iter().map(leaf_index));
            offset += page_size;
        }
        assert_eq!(paged, all, "page size {}", page_size);
    }

    assert!(index.get_leaves(id, 10, all.len()).unwrap().is_empty());
}

#[test]
fn test_expansion_zoom_is_finer_than_cluster() {
    let index = build(400);

    for zoom in 0..=10 {
        for feature in index.get_clusters(WORLD, zoom).unwrap() {
            let Some(id) = feature_cluster_id(&feature) else {
                continue;
            };
            let expansion = index.get_cluster_expansion_zoom(id).unwrap();
            assert!(expansion as i32 > zoom);
            assert!(expansion <= 11);
            if index.get_children(id).unwrap().len() > 1 {
                assert_eq!(expansion as i32, zoom + 1);
            }
        }
    }
}

#[test]
fn test_expansion_zoom_splits_cluster() {
    let index = build(400);

    for feature in index.get_clusters(WORLD, 0).unwrap() {
        let Some(id) = feature_cluster_id(&feature) else {
            continue;
        };
        let expansion = index.get_cluster_expansion_zoom(id).unwrap();
        let members: BTreeSet<u64> = index
            .get_leaves(id, usize::MAX, 0)
            .unwrap()
            .iter()
            .map(leaf_index)
            .collect();

        // At the expansion zoom the cluster's points are spread over
        // more than one feature.
        let holding = index
            .get_clusters(WORLD, expansion as i32)
            .unwrap()
            .into_iter()
            .filter(|f| match feature_cluster_id(f) {
                Some(cid) => index
                    .get_leaves(cid, usize::MAX, 0)
                    .unwrap()
                    .iter()
                    .any(|l| members.contains(&leaf_index(l))),
                None => members.contains(&leaf_index(f)),
            })
            .count();
        assert!(holding > 1, "cluster {} at expansion zoom {}", id, expansion);
    }
}

#[test]
fn test_tiles_cover_all_points() {
    let index = build(300);

    for z in 0..=2u8 {
        let n = 1u32 << z;
        let mut total = 0u64;
        for x in 0..n {
            for y in 0..n {
                for feature in index.get_tile(z, x, y).unwrap() {
                    let [px, py] = feature.position().unwrap();
                    // Count only features whose pixel lies inside the tile
                    // proper; the padding repeats neighbours.
                    if (0..512).contains(&px) && (0..512).contains(&py) {
                        total += feature
                            .tags
                            .get("point_count")
                            .and_then(|v| v.as_u64())
                            .unwrap_or(1);
                    }
                }
            }
        }
        assert_eq!(total, 300, "zoom {}", z);
    }
}

#[test]
fn test_reducer_sums_over_hierarchy() {
    let points: Vec<PointFeature> = scattered_points(200)
        .into_iter()
        .map(|p| p.with_property("weight", 2))
        .collect();
    let index = ClusterIndex::with_reducer(
        points,
        ClusterOptions::default().with_max_zoom(8),
        PropertySum::new(["weight"]),
    )
    .unwrap();

    for zoom in [0, 4, 8] {
        for feature in index.get_clusters(WORLD, zoom).unwrap() {
            let weight = feature
                .property("weight")
                .and_then(|v| v.as_f64())
                .unwrap();
            assert_eq!(weight, 2.0 * feature_point_count(&feature) as f64);
        }
    }
}

#[test]
fn test_build_is_deterministic() {
    let a = build(250);
    let b = build(250);

    assert_eq!(a.stats(), b.stats());
    for zoom in [0, 5, 11] {
        assert_eq!(
            a.get_clusters(WORLD, zoom).unwrap(),
            b.get_clusters(WORLD, zoom).unwrap()
        );
    }
}

#[test]
fn test_stats_levels() {
    let index = build(100);
    let stats = index.stats();

    assert_eq!(stats.num_points, 100);
    assert_eq!(stats.levels.len(), 12);
    assert_eq!(stats.levels.first().unwrap().0, 0);
    assert_eq!(*stats.levels.last().unwrap(), (11, 100));
}

#[test]
fn test_leaf_pagination_law() {
    let index = build(400);
    let top = index.get_clusters(WORLD, 0).unwrap();

    for feature in &top {
        let Some(id) = feature_cluster_id(feature) else {
            continue;
        };
        for (a, b) in [(1, 1), (3, 5), (10, 0), (0, 4)] {
            let joined = index.get_leaves(id, a + b, 0).unwrap();
            let mut split = index.get_leaves(id, a, 0).unwrap();
            split.extend(index.get_leaves(id, b, a).unwrap());
            assert_eq!(joined, split, "cluster {} a={} b={}", id, a, b);
        }
    }
}

#[test]
fn test_antimeridian_union_without_duplicates() {
    let points: Vec<PointFeature> = (0..200)
        .map(|i| {
            let lng = if i % 2 == 0 {
                170.0 + (i % 20) as f64 * 0.5
            } else {
                -179.5 + (i % 18) as f64 * 0.5
            };
            PointFeature::new(lng, ((i % 40) as f64 - 20.0) * 0.5).with_property("i", i as u64)
        })
        .collect();
    let index = ClusterIndex::new(points, ClusterOptions::default().with_max_zoom(10)).unwrap();

    for zoom in [0, 2, 5, 11] {
        let crossing = index.get_clusters([170.0, -10.0, -170.0, 10.0], zoom).unwrap();
        let mut union = index.get_clusters([170.0, -10.0, 180.0, 10.0], zoom).unwrap();
        for feature in index.get_clusters([-180.0, -10.0, -170.0, 10.0], zoom).unwrap() {
            if !union.contains(&feature) {
                union.push(feature);
            }
        }
        assert_eq!(crossing.len(), union.len(), "zoom {}", zoom);
        assert!(crossing.iter().all(|f| union.contains(f)));
    }
}
