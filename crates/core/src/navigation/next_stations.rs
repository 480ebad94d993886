//! Remaining stations in the direction of travel.
//!
//! Everything here works on arena indices into [`Line::stations`]: the
//! route is built as index ranges over the canonical order, reversed or
//! wrapped as direction and topology require, then junction duplicates are
//! collapsed and pass stations dropped.

use std::sync::Arc;

use tracing::warn;
use trainlcd_transit::{Direction, Line, Station, StationIdentifier};

use crate::navigation::error::{NavigationError, Result};

/// Arena index of `id` on `line`
pub fn locate(line: &Line, id: &StationIdentifier) -> Result<usize> {
    line.position_of(id)
        .ok_or_else(|| NavigationError::AmbiguousCurrentStation(id.clone()))
}

/// Index the route starts from. Unknown or missing stations start at 0.
pub fn current_station_index(line: &Line, current: Option<&StationIdentifier>) -> usize {
    match current.map(|id| locate(line, id)) {
        None => 0,
        Some(Ok(index)) => index,
        Some(Err(e)) => {
            warn!(line = %line.id, "{e}, starting from the first station");
            0
        }
    }
}

/// Travel order from `current_index` (inclusive), before any filtering.
///
/// Loop lines wrap around once when nothing stoppable is left beyond the
/// current station, so they always have somewhere to go.
fn travel_order(line: &Line, current_index: usize, direction: Direction) -> Vec<usize> {
    let n = line.len();
    if n == 0 {
        return Vec::new();
    }
    let current = current_index.min(n - 1);
    let ascending = direction.is_ascending(line.is_loop);

    let mut order: Vec<usize> = if ascending {
        (current..n).collect()
    } else {
        (0..=current).rev().collect()
    };

    if line.is_loop && !has_stop_beyond_first(line.stations(), &order) {
        if ascending {
            order.extend(0..n);
        } else {
            order.extend((0..n).rev());
        }
    }
    order
}

fn has_stop_beyond_first(stations: &[Arc<Station>], order: &[usize]) -> bool {
    let Some((&first, rest)) = order.split_first() else {
        return false;
    };
    rest.iter()
        .map(|&i| &stations[i])
        .any(|s| !s.pass && !s.is_same_group(&stations[first]))
}

/// Collapses consecutive occurrences of one junction station listed under
/// two adjacent segments, keeping the occurrence travel continues on.
fn collapse_junctions(stations: &[Arc<Station>], order: Vec<usize>) -> Vec<usize> {
    let mut collapsed: Vec<usize> = Vec::with_capacity(order.len());
    for index in order {
        match collapsed.last_mut() {
            Some(last) if stations[*last].is_junction_twin(&stations[index]) => {
                *last = index;
            }
            _ => collapsed.push(index),
        }
    }
    collapsed
}

/// Stations ahead of the current one in travel order, pass stations
/// included, junction duplicates collapsed.
pub fn route_ahead(line: &Line, current_index: usize, direction: Direction) -> Vec<usize> {
    let order = travel_order(line, current_index, direction);
    let mut route = collapse_junctions(line.stations(), order);
    if !route.is_empty() {
        // The head is the current station (or its junction twin)
        route.remove(0);
    }
    route
}

/// Stops ahead of the current one: [`route_ahead`] without pass stations.
///
/// Empty only at the terminus of a non-loop line.
pub fn next_stop_indices(line: &Line, current_index: usize, direction: Direction) -> Vec<usize> {
    route_ahead(line, current_index, direction)
        .into_iter()
        .filter(|&i| !line.stations()[i].pass)
        .collect()
}

/// Remaining stops the train will reach, nearest first.
pub fn next_stations(
    line: &Line,
    current: Option<&StationIdentifier>,
    direction: Direction,
) -> Vec<Arc<Station>> {
    let current_index = current_station_index(line, current);
    next_stop_indices(line, current_index, direction)
        .into_iter()
        .map(|i| line.stations()[i].clone())
        .collect()
}

/// Last stop of the remaining route, shown as "bound for".
pub fn bound_station(
    line: &Line,
    current: Option<&StationIdentifier>,
    direction: Direction,
) -> Option<Arc<Station>> {
    next_stations(line, current, direction).pop()
}
