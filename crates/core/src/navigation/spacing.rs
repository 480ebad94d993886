//! Average spacing between consecutive stations of a line.

use std::sync::Arc;

use itertools::Itertools;
use trainlcd_transit::Station;
use trainlcd_transit::spatial::haversine_distance;

/// Average spacing assumed when a line has fewer than two stations
pub const FALLBACK_AVERAGE_SPACING_M: f64 = 1_000.0;

/// Mean great-circle distance between topologically consecutive stations.
///
/// Pass stations count: they are physical points on the line. Consecutive
/// junction duplicates (same station group) are not a gap and are skipped.
pub fn average_spacing(stations: &[Arc<Station>]) -> f64 {
    let gaps: Vec<f64> = stations
        .iter()
        .tuple_windows()
        .filter(|(a, b)| !a.is_same_group(b))
        .map(|(a, b)| haversine_distance(a.location, b.location))
        .collect();

    if gaps.is_empty() {
        return FALLBACK_AVERAGE_SPACING_M;
    }
    gaps.iter().sum::<f64>() / gaps.len() as f64
}
