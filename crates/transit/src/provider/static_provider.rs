//! In-memory topology provider.
//!
//! Stores every fetched line in memory with a spatial index over their
//! stations for nearest-station queries.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;
use rstar::RTree;

use crate::identifiers::*;
use crate::models::{station::*, traits::*};
use crate::spatial::index::StationNode;
use crate::spatial::queries::{haversine_distance, search_radius_degrees};

/// Candidates pulled from the R-tree per requested station before the
/// haversine re-ranking in [`TopologyProvider::nearest_stations`]
const NEAREST_OVERSAMPLE: usize = 4;

/// In-memory topology provider with spatial indexing
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone)]
pub struct StaticTopologyProvider {
    lines: Vec<Arc<Line>>,

    // Lookup maps
    station_map: HashMap<StationIdentifier, Arc<Station>>,
    line_map: HashMap<LineIdentifier, Arc<Line>>,
    lines_by_station: HashMap<StationIdentifier, Vec<LineIdentifier>>,

    // Spatial index
    station_tree: RTree<StationNode>,
}

impl StaticTopologyProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            station_map: HashMap::new(),
            line_map: HashMap::new(),
            lines_by_station: HashMap::new(),
            station_tree: RTree::new(),
        }
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        let lines: Vec<Arc<Line>> = lines.into_iter().map(Arc::new).collect();

        let line_map: HashMap<_, _> = lines.iter().map(|l| (l.id.clone(), l.clone())).collect();

        // A station shared by several lines is indexed once, first line wins
        let mut station_map: HashMap<StationIdentifier, Arc<Station>> = HashMap::new();
        let mut lines_by_station: HashMap<StationIdentifier, Vec<LineIdentifier>> = HashMap::new();
        for line in &lines {
            for station in line.stations() {
                station_map
                    .entry(station.id.clone())
                    .or_insert_with(|| station.clone());
                let line_ids = lines_by_station.entry(station.id.clone()).or_default();
                if !line_ids.contains(&line.id) {
                    line_ids.push(line.id.clone());
                }
            }
        }

        let station_tree = RTree::bulk_load(
            station_map
                .values()
                .map(|s| StationNode::new(s.clone()))
                .collect(),
        );

        tracing::debug!(
            lines = lines.len(),
            stations = station_map.len(),
            "built topology provider"
        );

        Self {
            lines,
            station_map,
            line_map,
            lines_by_station,
            station_tree,
        }
    }
}

impl Default for StaticTopologyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyProvider for StaticTopologyProvider {
    fn get_station(&self, id: &StationIdentifier) -> Option<Arc<Station>> {
        self.station_map.get(id).cloned()
    }

    fn get_line(&self, id: &LineIdentifier) -> Option<Arc<Line>> {
        self.line_map.get(id).cloned()
    }

    fn all_lines(&self) -> Vec<Arc<Line>> {
        self.lines.clone()
    }

    fn lines_at(&self, id: &StationIdentifier) -> Vec<Arc<Line>> {
        self.lines_by_station
            .get(id)
            .map(|ids| ids.iter().filter_map(|l| self.line_map.get(l).cloned()).collect())
            .unwrap_or_default()
    }

    fn stations_near(&self, point: Point, radius_m: f64) -> Vec<Arc<Station>> {
        // Validate radius is positive
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let radius_deg = search_radius_degrees(point, radius_m);
        self.station_tree
            .locate_within_distance([point.x(), point.y()], radius_deg * radius_deg)
            .filter(|node| haversine_distance(point, node.station.location) <= radius_m)
            .map(|node| node.station.clone())
            .collect()
    }

    fn nearest_stations(&self, point: Point, n: usize) -> Vec<Arc<Station>> {
        let mut candidates: Vec<(f64, Arc<Station>)> = self
            .station_tree
            .nearest_neighbor_iter(&[point.x(), point.y()])
            .take(n.saturating_mul(NEAREST_OVERSAMPLE))
            .map(|node| (haversine_distance(point, node.station.location), node.station.clone()))
            .collect();

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.into_iter().take(n).map(|(_, s)| s).collect()
    }
}
