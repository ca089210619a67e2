//! Greedy hierarchical clustering, finest level first.
//!
//! Starting from the leaf level (one record per input point, at
//! `max_zoom + 1`), each coarser level `z` is derived from the level below:
//!
//! 1. Visit every not-yet-visited record `p` in array order.
//! 2. Find the unvisited records within `radius / (extent * 2^z)` of `p`.
//! 3. If there is at least one and `p` plus its neighbours hold at least
//!    `min_points` points, emit one aggregate at their point-weighted
//!    centroid and make it the parent of all of them.
//! 4. Otherwise carry `p` (and any too-small neighbourhood) up unchanged,
//!    one new record per carried record.
//!
//! Visiting order decides which record seeds an aggregate when
//! neighbourhoods overlap, so it must stay the inherited array order.

use super::reduce::PropertyReducer;
use super::{ClusterRecord, Level, Origin};
use crate::compute::projection;
use crate::config::ClusterOptions;
use geocluster_types::point::{PointFeature, Properties};
use std::sync::Arc;

/// Build every level, returned coarsest first with the leaf level last.
pub(crate) fn build_levels(
    points: &[PointFeature],
    options: &ClusterOptions,
    reducer: Option<&dyn PropertyReducer>,
) -> Vec<Level> {
    let leaves: Vec<ClusterRecord> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let c = projection::project(&p.point);
            ClusterRecord::leaf(i as u32, c.x, c.y)
        })
        .collect();

    let mut current = Level::new(options.max_zoom + 1, leaves, Vec::new());
    let mut levels = Vec::with_capacity((options.max_zoom - options.min_zoom) as usize + 2);

    for zoom in (options.min_zoom..=options.max_zoom).rev() {
        let coarser = cluster_level(&mut current, zoom, points, options, reducer);
        log::debug!(
            "zoom {}: {} records from {}",
            zoom,
            coarser.records.len(),
            current.records.len()
        );
        levels.push(current);
        current = coarser;
    }
    levels.push(current);
    levels.reverse();
    levels
}

/// Derive level `zoom` from `finer`, filling in the parent links of `finer`.
fn cluster_level(
    finer: &mut Level,
    zoom: u8,
    points: &[PointFeature],
    options: &ClusterOptions,
    reducer: Option<&dyn PropertyReducer>,
) -> Level {
    let radius = options.radius_at(zoom);
    let count = finer.records.len();
    let mut visited = vec![false; count];
    let mut records: Vec<ClusterRecord> = Vec::with_capacity(count);
    let mut children: Vec<u32> = Vec::new();

    for i in 0..count {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let (seed_x, seed_y, seed_points) = {
            let seed = &finer.records[i];
            (seed.x, seed.y, seed.num_points)
        };

        let mut neighbors = finer.index.within(seed_x, seed_y, radius);
        neighbors.retain(|j| !visited[*j as usize]);

        let num_points: u64 = seed_points as u64
            + neighbors
                .iter()
                .map(|&j| finer.records[j as usize].num_points as u64)
                .sum::<u64>();

        if !neighbors.is_empty() && num_points >= options.min_points as u64 {
            let parent = records.len() as u32;
            let start = children.len() as u32;
            let mut wx = seed_x * seed_points as f64;
            let mut wy = seed_y * seed_points as f64;
            let mut properties = reducer.map(|r| mapped_properties(&finer.records[i], points, r));

            children.push(i as u32);
            finer.records[i].parent = Some(parent);

            for &j in &neighbors {
                visited[j as usize] = true;
                let neighbor = &mut finer.records[j as usize];
                neighbor.parent = Some(parent);
                wx += neighbor.x * neighbor.num_points as f64;
                wy += neighbor.y * neighbor.num_points as f64;
                children.push(j);

                if let (Some(r), Some(acc)) = (reducer, properties.as_mut()) {
                    let other = mapped_properties(neighbor, points, r);
                    r.reduce(acc, &other);
                }
            }

            records.push(ClusterRecord {
                x: wx / num_points as f64,
                y: wy / num_points as f64,
                num_points: num_points as u32,
                parent: None,
                origin: Origin::Merged {
                    start,
                    len: neighbors.len() as u32 + 1,
                },
                point: finer.records[i].point,
                properties: properties.map(Arc::new),
            });
        } else {
            carry(finer, i as u32, &mut records);
            // A neighbourhood too small to cluster is carried up as a whole
            // so none of it can seed a cluster on this level later.
            for &j in &neighbors {
                visited[j as usize] = true;
                carry(finer, j, &mut records);
            }
        }
    }

    Level::new(zoom, records, children)
}

/// Copy `finer.records[i]` onto the coarser level as its own parent record.
fn carry(finer: &mut Level, i: u32, records: &mut Vec<ClusterRecord>) {
    let source = &mut finer.records[i as usize];
    source.parent = Some(records.len() as u32);
    records.push(ClusterRecord {
        x: source.x,
        y: source.y,
        num_points: source.num_points,
        parent: None,
        origin: Origin::Carried(i),
        point: source.point,
        properties: source.properties.clone(),
    });
}

/// Properties a record contributes to a new aggregate: accumulated ones for
/// clusters, mapped input properties for single points.
fn mapped_properties(
    record: &ClusterRecord,
    points: &[PointFeature],
    reducer: &dyn PropertyReducer,
) -> Properties {
    match &record.properties {
        Some(acc) if record.is_cluster() => (**acc).clone(),
        _ => reducer.map(&points[record.point as usize].properties),
    }
}
