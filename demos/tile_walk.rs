//! Tile Walk Example
//!
//! Registers a session from GeoJSON, renders the features of every tile down
//! to zoom 2 and shows how a view across the antimeridian is answered.

use geocluster::{ClusterRegistry, TileCoord};
use std::error::Error;

const FEATURES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type":"Feature","geometry":{"type":"Point","coordinates":[174.7633,-36.8485]},"properties":{"name":"Auckland"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[178.4419,-18.1416]},"properties":{"name":"Suva"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[-171.7514,-13.8333]},"properties":{"name":"Apia"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[-175.1982,-21.1394]},"properties":{"name":"Nukualofa"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[-157.8583,21.3069]},"properties":{"name":"Honolulu"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[151.2093,-33.8688]},"properties":{"name":"Sydney"}}
    ]
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== geocluster - Tile Walk ===\n");

    let registry = ClusterRegistry::new();
    registry.load_geojson("pacific", FEATURES, Some(r#"{"radius": 50, "maxZoom": 10}"#))?;

    for z in 0..=2u8 {
        let n = 1u32 << z;
        for x in 0..n {
            for y in 0..n {
                let coord = TileCoord::new(z, x, y);
                let features = registry.get_tile("pacific", coord.z, coord.x, coord.y)?;
                if features.is_empty() {
                    continue;
                }
                println!("tile {}/{}/{}: {} features", z, x, y, features.len());
                for feature in features {
                    let [px, py] = feature.position().unwrap_or([0, 0]);
                    let label = feature
                        .tags
                        .get("point_count_abbreviated")
                        .or_else(|| feature.tags.get("name"))
                        .cloned()
                        .unwrap_or_default();
                    println!("   ({:>5}, {:>5}) {}", px, py, label);
                }
            }
        }
    }

    println!("\nView from 170E to 170W at zoom 3:");
    for feature in registry.get_clusters("pacific", [170.0, -40.0, -170.0, 0.0], 3)? {
        println!("   {:?}", feature.properties);
    }

    registry.destroy("pacific")?;
    println!("\n✓ Session destroyed, {} remaining", registry.len());
    Ok(())
}
