use crate::error::MapError;
use crate::types::{Coordinate, Overlap};
use geo::{Centroid, Geometry};
use std::collections::HashMap;
use tracing::info;

/// One coordinate per geometry, in input order. Points are taken as-is, everything
/// else is reduced to its centroid.
pub fn extract_coordinates(geometries: &[Geometry<f64>]) -> Result<Vec<Coordinate>, MapError> {
    geometries
        .iter()
        .enumerate()
        .map(|(index, geometry)| match geometry {
            Geometry::Point(pt) => Ok(Coordinate::from(*pt)),
            other => other
                .centroid()
                .map(Coordinate::from)
                .ok_or(MapError::NoCentroid { index }),
        })
        .collect()
}

// Exact-value key. -0.0 and 0.0 compare equal, so they share a key.
fn coordinate_key(coord: &Coordinate) -> (u64, u64) {
    let bits = |v: f64| if v == 0.0 { 0 } else { v.to_bits() };
    (bits(coord.lat), bits(coord.lon))
}

/// Frequency of each distinct coordinate, in first-seen order.
pub fn count_overlaps(coords: &[Coordinate]) -> Vec<Overlap> {
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();
    let mut overlaps: Vec<Overlap> = Vec::new();

    for coord in coords {
        let slot = *index.entry(coordinate_key(coord)).or_insert_with(|| {
            overlaps.push(Overlap { coordinate: *coord, count: 0 });
            overlaps.len() - 1
        });
        overlaps[slot].count += 1;
    }

    info!(
        "Counted {} distinct coordinates across {} points",
        overlaps.len(),
        coords.len()
    );
    overlaps
}

/// Overlaps ordered most frequent first. Equal counts keep first-seen order.
pub fn rank_by_frequency(mut overlaps: Vec<Overlap>) -> Vec<Overlap> {
    overlaps.sort_by(|a, b| b.count.cmp(&a.count));
    overlaps
}

pub fn mean_center(coords: &[Coordinate]) -> Result<Coordinate, MapError> {
    if coords.is_empty() {
        return Err(MapError::EmptyDataset);
    }
    let n = coords.len() as f64;
    let lat = coords.iter().map(|c| c.lat).sum::<f64>() / n;
    let lon = coords.iter().map(|c| c.lon).sum::<f64>() / n;
    Ok(Coordinate::new(lat, lon))
}
