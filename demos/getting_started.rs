//! Getting Started Example
//!
//! Builds a clustering index over a handful of cities and walks the
//! hierarchy from the world view down to individual points.

use geocluster::{
    ClusterIndex, ClusterOptions, PointFeature, PropertySum, feature_cluster_id,
    feature_point_count,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== geocluster - Getting Started ===\n");

    let cities = [
        ("New York", -74.0060, 40.7128, 8_336),
        ("Newark", -74.1724, 40.7357, 311),
        ("Philadelphia", -75.1652, 39.9526, 1_603),
        ("London", -0.1278, 51.5074, 8_982),
        ("Paris", 2.3522, 48.8566, 2_161),
        ("Brussels", 4.3517, 50.8503, 1_209),
        ("Tokyo", 139.6917, 35.6895, 13_960),
        ("Yokohama", 139.6380, 35.4437, 3_757),
    ];

    let points: Vec<PointFeature> = cities
        .iter()
        .map(|&(name, lon, lat, population)| {
            PointFeature::new(lon, lat)
                .with_property("name", name)
                .with_property("population", population)
        })
        .collect();

    // Sum population into every cluster
    let index = ClusterIndex::with_reducer(
        points,
        ClusterOptions::default().with_radius(60).with_max_zoom(12),
        PropertySum::new(["population"]),
    )?;
    println!("✓ Built index over {} cities\n", index.len());

    println!("1. World view at zoom 1");
    println!("-----------------------");
    let world = index.get_clusters([-180.0, -85.0, 180.0, 85.0], 1)?;
    for feature in &world {
        match feature_cluster_id(feature) {
            Some(id) => println!(
                "   cluster {} with {} cities, population {}",
                id,
                feature_point_count(feature),
                feature.property("population").unwrap_or(&0.into())
            ),
            None => println!("   {}", feature.property("name").unwrap_or(&"?".into())),
        }
    }

    println!("\n2. Drilling into the largest cluster");
    println!("------------------------------------");
    let Some(largest) = world.iter().max_by_key(|f| feature_point_count(f)) else {
        return Ok(());
    };
    if let Some(id) = feature_cluster_id(largest) {
        let zoom = index.get_cluster_expansion_zoom(id)?;
        println!("   splits at zoom {}", zoom);

        for child in index.get_children(id)? {
            println!("   child with {} cities", feature_point_count(&child));
        }

        for leaf in index.get_leaves(id, 10, 0)? {
            println!("   leaf: {}", leaf.property("name").unwrap_or(&"?".into()));
        }
    }

    println!("\n3. Index levels");
    println!("---------------");
    for (zoom, count) in index.stats().levels {
        println!("   zoom {:>2}: {} records", zoom, count);
    }

    Ok(())
}
