//! The position state machine.
//!
//! One [`PositionTracker`] per trip. It is the only writer of
//! [`NavigationState`] and processes fixes strictly one at a time.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};
use trainlcd_transit::{Direction, Line, Station};

use crate::location::{GeoFix, LocationError};
use crate::navigation::error::{NavigationError, Result};
use crate::navigation::headline::Headline;
use crate::navigation::next_stations::{next_stop_indices, route_ahead};
use crate::navigation::scoring::{ScoredStation, score_all_stations, score_stations};
use crate::navigation::spacing::average_spacing;
use crate::navigation::threshold::{ThresholdConfig, Thresholds};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: ThresholdConfig,
    /// Passing through a non-stop station right before the next stop counts
    /// as approaching that stop (never on high-speed lines)
    pub early_approach_on_pass: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            early_approach_on_pass: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()
    }
}

/// What the display shows. Re-emitted after every processed fix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationState {
    pub current_station: Option<Arc<Station>>,
    pub next_station: Option<Arc<Station>>,
    /// At the nearest station
    pub arrived: bool,
    /// Close to the next station
    pub approaching: bool,
}

impl NavigationState {
    pub fn headline(&self) -> Headline {
        Headline::from_state(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No fix classified yet on the active route
    Bootstrap,
    InTransit { current: usize },
}

pub struct PositionTracker {
    config: EngineConfig,
    line: Arc<Line>,
    direction: Direction,
    phase: Phase,
    state: NavigationState,
    last_fix: Option<GeoFix>,
}

impl PositionTracker {
    pub fn new(line: Arc<Line>, direction: Direction, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(line, direction, config))
    }

    pub fn with_default_config(line: Arc<Line>, direction: Direction) -> Self {
        Self::with_config(line, direction, EngineConfig::default())
    }

    fn with_config(line: Arc<Line>, direction: Direction, config: EngineConfig) -> Self {
        info!(line = %line.id, ?direction, stations = line.len(), "tracking route");
        Self {
            config,
            line,
            direction,
            phase: Phase::Bootstrap,
            state: NavigationState::default(),
            last_fix: None,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn line(&self) -> &Arc<Line> {
        &self.line
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_bootstrapping(&self) -> bool {
        self.phase == Phase::Bootstrap
    }

    /// Switches line or direction mid-trip.
    ///
    /// The current station is re-bootstrapped from the last known fix, if
    /// there is one.
    pub fn select_route(&mut self, line: Arc<Line>, direction: Direction) -> NavigationState {
        info!(line = %line.id, ?direction, "route selected");
        self.line = line;
        self.direction = direction;
        self.phase = Phase::Bootstrap;
        self.state = NavigationState::default();

        match self.last_fix.clone() {
            Some(fix) => self.process(&fix),
            None => self.state.clone(),
        }
    }

    /// Entry point for the location subscription.
    ///
    /// Location errors are handed back untouched and leave the state as is.
    pub fn handle(
        &mut self,
        fix: std::result::Result<GeoFix, LocationError>,
    ) -> std::result::Result<NavigationState, LocationError> {
        match fix {
            Ok(fix) => Ok(self.process(&fix)),
            Err(e) => {
                tracing::warn!("location unavailable: {e}");
                Err(e)
            }
        }
    }

    /// Classifies one fix. A fix that cannot be classified is a no-op and
    /// the previous state is returned.
    pub fn process(&mut self, fix: &GeoFix) -> NavigationState {
        match self.try_process(fix) {
            Ok(state) => state,
            Err(e) => {
                debug!("fix ignored: {e}");
                self.state.clone()
            }
        }
    }

    pub fn try_process(&mut self, fix: &GeoFix) -> Result<NavigationState> {
        self.last_fix = Some(fix.clone());

        let line = self.line.clone();
        let stations = line.stations();
        let scored = score_stations(stations, fix.location);
        let nearest = scored.first().ok_or(NavigationError::TopologyUnavailable)?;

        let spacing = average_spacing(stations);
        let thresholds = self.config.thresholds.thresholds(line.line_type, spacing);
        let arrived = nearest.distance_m < thresholds.arrived_m;

        // Bootstrap takes the nearest station before evaluating approach, so
        // the same fix fed twice classifies identically
        if arrived || self.phase == Phase::Bootstrap {
            self.move_to(nearest);
        }
        let Phase::InTransit { current } = self.phase else {
            return Err(NavigationError::TopologyUnavailable);
        };

        let approaching = !arrived && self.is_approaching(fix, nearest, current, &thresholds);
        let next_station = next_stop_indices(&line, current, self.direction)
            .first()
            .map(|&i| stations[i].clone());

        debug!(
            nearest = %nearest.station.id,
            distance_m = nearest.distance_m,
            arrived_m = thresholds.arrived_m,
            approaching_m = thresholds.approaching_m,
            arrived,
            approaching,
            "fix classified"
        );

        self.state = NavigationState {
            current_station: Some(stations[current].clone()),
            next_station,
            arrived,
            approaching,
        };
        Ok(self.state.clone())
    }

    fn move_to(&mut self, nearest: &ScoredStation) {
        if self.phase != (Phase::InTransit { current: nearest.index }) {
            info!(
                station = %nearest.station.id,
                name = %nearest.station.name,
                distance_m = nearest.distance_m,
                "current station changed"
            );
        }
        self.phase = Phase::InTransit {
            current: nearest.index,
        };
    }

    fn is_approaching(
        &self,
        fix: &GeoFix,
        nearest: &ScoredStation,
        current: usize,
        thresholds: &Thresholds,
    ) -> bool {
        let stations = self.line.stations();
        let route = route_ahead(&self.line, current, self.direction);
        let Some(next_pos) = route.iter().position(|&i| !stations[i].pass) else {
            return false;
        };

        if self.passing_before_next_stop(fix, &route, next_pos, thresholds) {
            return true;
        }

        if nearest.distance_m >= thresholds.approaching_m
            || nearest.station.is_same_group(&stations[current])
        {
            return false;
        }

        // Nearest stop must be the next stop or beyond it in travel order
        self.approach_window(&route, current, next_pos)
            .iter()
            .position(|&i| stations[i].is_same_group(&nearest.station))
            .is_some_and(|pos| pos >= next_pos)
    }

    /// The part of `route` still ahead of the train.
    ///
    /// On a loop the route comes back around to the stop just behind the
    /// current station; everything from there on is behind the train. The
    /// next stop itself is always kept.
    fn approach_window<'r>(
        &self,
        route: &'r [usize],
        current: usize,
        next_pos: usize,
    ) -> &'r [usize] {
        let stations = self.line.stations();
        let behind = next_stop_indices(&self.line, current, self.direction.reversed())
            .first()
            .map(|&i| &stations[i]);

        let end = route
            .iter()
            .enumerate()
            .skip(next_pos + 1)
            .find(|&(_, &i)| {
                stations[i].is_same_group(&stations[current])
                    || behind.is_some_and(|b| stations[i].is_same_group(b))
            })
            .map_or(route.len(), |(pos, _)| pos);
        &route[..end]
    }

    /// The train is at the pass station immediately preceding the next stop.
    ///
    /// Only that one station triggers: in a run of consecutive pass stations
    /// the earlier ones do not.
    fn passing_before_next_stop(
        &self,
        fix: &GeoFix,
        route: &[usize],
        next_pos: usize,
        thresholds: &Thresholds,
    ) -> bool {
        if !self.config.early_approach_on_pass
            || self.line.line_type.is_high_speed()
            || next_pos == 0
        {
            return false;
        }
        let stations = self.line.stations();
        let passing = &stations[route[next_pos - 1]];

        score_all_stations(stations, fix.location)
            .first()
            .is_some_and(|closest| {
                closest.station.pass
                    && closest.station.is_same_group(passing)
                    && closest.distance_m < thresholds.approaching_m
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::fixtures::*;
    use chrono::{TimeZone, Utc};
    use trainlcd_transit::LineType;

    fn fix_at_km(km: f64) -> GeoFix {
        let p = at_km(km);
        let timestamp = Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap();
        GeoFix::new(p.y(), p.x(), timestamp).unwrap()
    }

    fn tracker(stations: Vec<Station>, is_loop: bool, direction: Direction) -> PositionTracker {
        PositionTracker::with_default_config(Arc::new(line(stations, is_loop)), direction)
    }

    fn current_id(state: &NavigationState) -> Option<&str> {
        state.current_station.as_ref().map(|s| s.id.as_str())
    }

    fn next_id(state: &NavigationState) -> Option<&str> {
        state.next_station.as_ref().map(|s| s.id.as_str())
    }

    #[test]
    fn test_initial_state_is_unset() {
        let tracker = tracker(evenly_spaced(&["a", "b"]), false, Direction::Inbound);

        assert_eq!(tracker.state(), &NavigationState::default());
        assert!(tracker.is_bootstrapping());
    }

    #[test]
    fn test_first_fix_bootstraps_without_arriving() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c", "d"]), false, Direction::Inbound);

        // 400 m past b: outside the 200 m arrived radius
        let state = tracker.process(&fix_at_km(1.4));
        assert_eq!(current_id(&state), Some("b"));
        assert_eq!(next_id(&state), Some("c"));
        assert!(!state.arrived);
        assert!(!tracker.is_bootstrapping());
    }

    #[test]
    fn test_current_station_only_changes_on_arrival() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c", "d"]), false, Direction::Inbound);
        tracker.process(&fix_at_km(0.0));

        // Nearest is b at 400 m: not arrived, current stays a
        let state = tracker.process(&fix_at_km(0.6));
        assert_eq!(current_id(&state), Some("a"));
        assert_eq!(next_id(&state), Some("b"));

        let state = tracker.process(&fix_at_km(0.96));
        assert!(state.arrived);
        assert_eq!(current_id(&state), Some("b"));
        assert_eq!(next_id(&state), Some("c"));
    }

    #[test]
    fn test_arrival_overrides_previous_station() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c", "d"]), false, Direction::Inbound);
        tracker.process(&fix_at_km(3.0));

        // 40 m from a, well inside the arrived threshold
        let state = tracker.process(&fix_at_km(0.04));
        assert!(state.arrived);
        assert!(!state.approaching);
        assert_eq!(current_id(&state), Some("a"));
    }

    #[test]
    fn test_approaching_next_station() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c", "d"]), false, Direction::Inbound);
        tracker.process(&fix_at_km(0.0));

        // 300 m before b: inside approaching (500 m), outside arrived (200 m)
        let state = tracker.process(&fix_at_km(0.7));
        assert!(state.approaching);
        assert!(!state.arrived);
        assert_eq!(next_id(&state), Some("b"));
    }

    #[test]
    fn test_not_approaching_station_behind() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c", "d"]), false, Direction::Outbound);
        tracker.process(&fix_at_km(2.0));

        // Outbound from c heads to b; d is behind the train
        let state = tracker.process(&fix_at_km(2.7));
        assert_eq!(current_id(&state), Some("c"));
        assert_eq!(next_id(&state), Some("b"));
        assert!(!state.approaching);
    }

    #[test]
    fn test_leaving_current_station_is_not_approaching() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c"]), true, Direction::Outbound);
        tracker.process(&fix_at_km(2.0));

        // 300 m out of c on a loop: c reappears at the end of the wrapped route
        let state = tracker.process(&fix_at_km(1.7));
        assert_eq!(current_id(&state), Some("c"));
        assert_eq!(next_id(&state), Some("a"));
        assert!(!state.approaching);
    }

    #[test]
    fn test_loop_seam_stop_behind_is_not_approaching() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c", "d"]), true, Direction::Outbound);
        tracker.process(&fix_at_km(3.0));

        // 400 m from c, which the train just left behind on its way to a
        let state = tracker.process(&fix_at_km(2.4));
        assert_eq!(current_id(&state), Some("d"));
        assert_eq!(next_id(&state), Some("a"));
        assert!(!state.approaching);

        let state = tracker.process(&fix_at_km(0.4));
        assert_eq!(next_id(&state), Some("a"));
        assert!(state.approaching);
    }

    #[test]
    fn test_loop_seam_stop_behind_is_not_approaching_inbound() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c", "d"]), true, Direction::Inbound);
        tracker.process(&fix_at_km(0.0));

        // Inbound on a loop runs a -> d -> c -> b; b is behind
        let state = tracker.process(&fix_at_km(0.6));
        assert_eq!(current_id(&state), Some("a"));
        assert_eq!(next_id(&state), Some("d"));
        assert!(!state.approaching);

        let state = tracker.process(&fix_at_km(2.6));
        assert_eq!(next_id(&state), Some("d"));
        assert!(state.approaching);
    }

    #[test]
    fn test_loop_stop_beyond_next_still_approaching() {
        let mut tracker = tracker(
            evenly_spaced(&["a", "b", "c", "d", "e", "f"]),
            true,
            Direction::Outbound,
        );
        tracker.process(&fix_at_km(5.0));

        // Next stop a was missed; b is still ahead of the train
        let state = tracker.process(&fix_at_km(1.3));
        assert_eq!(current_id(&state), Some("f"));
        assert!(state.approaching);
    }

    #[test]
    fn test_pass_station_signals_next_stop() {
        let mut tracker = tracker(
            vec![station("a", 0.0), pass_station("b", 1.0), station("c", 2.0)],
            false,
            Direction::Inbound,
        );
        tracker.process(&fix_at_km(0.0));

        // Right at b: a and c are both 1 km away, far outside approaching
        let state = tracker.process(&fix_at_km(1.05));
        assert!(state.approaching);
        assert!(!state.arrived);
        assert_eq!(current_id(&state), Some("a"));
        assert_eq!(next_id(&state), Some("c"));
    }

    #[test]
    fn test_pass_station_ignored_on_high_speed_lines() {
        let line = Line::new(
            "shinkansen",
            "Shinkansen",
            LineType::BulletTrain,
            false,
            vec![station("a", 0.0), pass_station("b", 1.0), station("c", 4.0)],
        );
        let mut tracker = PositionTracker::with_default_config(Arc::new(line), Direction::Inbound);
        tracker.process(&fix_at_km(0.0));

        // At b: c is 3 km out, beyond the doubled 2 km approaching radius
        let state = tracker.process(&fix_at_km(1.0));
        assert!(!state.approaching);
        assert_eq!(next_id(&state), Some("c"));
    }

    #[test]
    fn test_only_last_of_consecutive_pass_stations_triggers() {
        let mut tracker = tracker(
            vec![
                station("a", 0.0),
                pass_station("p1", 2.0),
                pass_station("p2", 4.0),
                station("c", 6.0),
            ],
            false,
            Direction::Inbound,
        );
        tracker.process(&fix_at_km(0.0));

        assert!(!tracker.process(&fix_at_km(2.0)).approaching);
        assert!(tracker.process(&fix_at_km(4.0)).approaching);
    }

    #[test]
    fn test_early_approach_can_be_disabled() {
        let line = Arc::new(line(
            vec![station("a", 0.0), pass_station("b", 1.0), station("c", 2.0)],
            false,
        ));
        let config = EngineConfig {
            early_approach_on_pass: false,
            ..EngineConfig::default()
        };
        let mut tracker = PositionTracker::new(line, Direction::Inbound, config).unwrap();
        tracker.process(&fix_at_km(0.0));

        assert!(!tracker.process(&fix_at_km(1.05)).approaching);
    }

    #[test]
    fn test_pass_stations_never_current_or_next() {
        let mut tracker = tracker(
            vec![station("a", 0.0), pass_station("b", 1.0), station("c", 2.0)],
            false,
            Direction::Inbound,
        );

        for km in [0.0, 0.5, 1.0, 1.02, 1.5, 2.0] {
            let state = tracker.process(&fix_at_km(km));
            assert!(state.current_station.as_ref().is_none_or(|s| !s.pass));
            assert!(state.next_station.as_ref().is_none_or(|s| !s.pass));
        }
    }

    #[test]
    fn test_same_fix_twice_is_idempotent() {
        for km in [0.0, 0.3, 0.7, 1.5, 2.9] {
            let mut tracker =
                tracker(evenly_spaced(&["a", "b", "c", "d"]), false, Direction::Inbound);
            let first = tracker.process(&fix_at_km(km));
            let second = tracker.process(&fix_at_km(km));
            assert_eq!(first, second, "at {km} km");
        }
    }

    #[test]
    fn test_arrived_and_approaching_are_exclusive() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c", "d"]), false, Direction::Inbound);
        tracker.process(&fix_at_km(0.0));

        for step in 0..=30 {
            let state = tracker.process(&fix_at_km(step as f64 * 0.1));
            assert!(!(state.arrived && state.approaching), "step {step}");
        }
    }

    #[test]
    fn test_terminus_has_no_next_station() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c"]), false, Direction::Inbound);

        let state = tracker.process(&fix_at_km(2.0));
        assert!(state.arrived);
        assert_eq!(current_id(&state), Some("c"));
        assert_eq!(next_id(&state), None);
        assert!(matches!(state.headline(), Headline::Arrived(s) if s.id.as_str() == "c"));
    }

    #[test]
    fn test_empty_topology_is_a_noop() {
        let mut tracker = tracker(Vec::new(), false, Direction::Inbound);

        assert_eq!(
            tracker.try_process(&fix_at_km(0.0)),
            Err(NavigationError::TopologyUnavailable)
        );
        assert_eq!(tracker.process(&fix_at_km(0.0)), NavigationState::default());
        assert!(tracker.is_bootstrapping());
    }

    #[test]
    fn test_location_error_leaves_state_untouched() {
        let mut tracker = tracker(evenly_spaced(&["a", "b"]), false, Direction::Inbound);
        let before = tracker.process(&fix_at_km(0.0));

        let result = tracker.handle(Err(LocationError::Timeout));
        assert_eq!(result, Err(LocationError::Timeout));
        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn test_route_change_rebootstraps_from_last_fix() {
        let mut tracker = tracker(evenly_spaced(&["a", "b", "c", "d"]), false, Direction::Inbound);
        tracker.process(&fix_at_km(0.0));
        tracker.process(&fix_at_km(1.4));
        assert_eq!(current_id(tracker.state()), Some("a"));

        // Flipping direction re-bootstraps onto the nearest station
        let line = tracker.line().clone();
        let state = tracker.select_route(line, Direction::Outbound);
        assert_eq!(current_id(&state), Some("b"));
        assert_eq!(next_id(&state), Some("a"));
    }

    #[test]
    fn test_route_change_without_fix_resets() {
        let mut tracker = tracker(evenly_spaced(&["a", "b"]), false, Direction::Inbound);
        let other = Arc::new(line(evenly_spaced(&["x", "y"]), true));

        let state = tracker.select_route(other, Direction::Outbound);
        assert_eq!(state, NavigationState::default());
        assert!(tracker.is_bootstrapping());
        assert_eq!(tracker.direction(), Direction::Outbound);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            thresholds: ThresholdConfig {
                approaching_ratio: 0.1,
                ..ThresholdConfig::default()
            },
            ..EngineConfig::default()
        };
        let line = Arc::new(line(evenly_spaced(&["a", "b"]), false));

        assert!(PositionTracker::new(line, Direction::Inbound, config).is_err());
    }
}
