//! Ranks the stations of a line by great-circle distance to a fix.

use std::sync::Arc;

use geo::Point;
use trainlcd_transit::Station;
use trainlcd_transit::spatial::haversine_distance;

/// A station paired with its distance to the fix being processed
#[derive(Debug, Clone)]
pub struct ScoredStation {
    /// Arena index into the line's stations
    pub index: usize,
    pub station: Arc<Station>,
    pub distance_m: f64,
}

/// Stopping stations sorted by ascending distance to `point`.
///
/// Pass stations are dropped. Equal distances keep topology order.
pub fn score_stations(stations: &[Arc<Station>], point: Point) -> Vec<ScoredStation> {
    score(stations, point, |s| !s.pass)
}

/// Like [`score_stations`] but keeps pass stations, for reasoning about
/// physical position rather than what the display may show.
pub fn score_all_stations(stations: &[Arc<Station>], point: Point) -> Vec<ScoredStation> {
    score(stations, point, |_| true)
}

fn score(
    stations: &[Arc<Station>],
    point: Point,
    keep: impl Fn(&Station) -> bool,
) -> Vec<ScoredStation> {
    let mut scored: Vec<ScoredStation> = stations
        .iter()
        .enumerate()
        .filter(|(_, s)| keep(s))
        .map(|(index, s)| ScoredStation {
            index,
            station: s.clone(),
            distance_m: haversine_distance(point, s.location),
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::fixtures::*;

    fn shared(stations: Vec<Station>) -> Vec<Arc<Station>> {
        stations.into_iter().map(Arc::new).collect()
    }

    #[test]
    fn test_sorted_ascending_without_pass_stations() {
        let stations = shared(vec![
            station("a", 0.0),
            pass_station("b", 1.0),
            station("c", 2.0),
            station("d", 3.0),
        ]);

        let scored = score_stations(&stations, at_km(2.2));
        let order: Vec<&str> = scored.iter().map(|s| s.station.id.as_str()).collect();
        assert_eq!(order, vec!["c", "d", "a"]);
        assert!(scored.windows(2).all(|w| w[0].distance_m <= w[1].distance_m));
        assert!(scored.iter().all(|s| !s.station.pass));
        assert_eq!(scored[0].index, 2);
    }

    #[test]
    fn test_distance_in_meters() {
        let stations = shared(vec![station("a", 0.0)]);

        let scored = score_stations(&stations, at_km(0.5));
        assert!((scored[0].distance_m - 500.0).abs() < 1.0);
    }

    #[test]
    fn test_ties_keep_topology_order() {
        // Two platforms sharing one coordinate
        let stations = shared(vec![
            station("far", 3.0),
            station("second", 1.0),
            station("first", 1.0),
        ]);

        let scored = score_stations(&stations, at_km(0.0));
        let order: Vec<&str> = scored.iter().map(|s| s.station.id.as_str()).collect();
        assert_eq!(order, vec!["second", "first", "far"]);
    }

    #[test]
    fn test_empty_topology_scores_nothing() {
        assert!(score_stations(&[], at_km(0.0)).is_empty());
    }

    #[test]
    fn test_score_all_keeps_pass_stations() {
        let stations = shared(vec![station("a", 0.0), pass_station("b", 1.0)]);

        let scored = score_all_stations(&stations, at_km(1.0));
        assert_eq!(scored[0].station.id.as_str(), "b");
        assert_eq!(scored.len(), 2);
    }
}
