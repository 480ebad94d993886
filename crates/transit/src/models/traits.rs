//! Provider trait for topology lookups.
//!
//! Implementations can be in-memory, database-backed, or remote.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::*;
use crate::models::station::{Line, Station};

/// Read-only access to every line and station known to a collaborator
pub trait TopologyProvider: Send + Sync {
    // ---- Lookups ----
    fn get_station(&self, id: &StationIdentifier) -> Option<Arc<Station>>;
    fn get_line(&self, id: &LineIdentifier) -> Option<Arc<Line>>;

    // ---- Collections ----
    fn all_lines(&self) -> Vec<Arc<Line>>;

    /// Lines whose topology contains the station
    fn lines_at(&self, id: &StationIdentifier) -> Vec<Arc<Line>>;

    // ---- Spatial queries ----

    /// Find stations within radius (meters)
    fn stations_near(&self, point: Point, radius_m: f64) -> Vec<Arc<Station>>;

    /// Find the N nearest stations to a point, closest first
    fn nearest_stations(&self, point: Point, n: usize) -> Vec<Arc<Station>>;
}
