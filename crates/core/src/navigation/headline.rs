//! Which announcement the display leads with for a given state.

use std::sync::Arc;

use trainlcd_transit::Station;

use crate::navigation::tracker::NavigationState;

#[derive(Debug, Clone, PartialEq)]
pub enum Headline {
    /// "Now stopping at"
    Arrived(Arc<Station>),
    /// "Arriving soon at"
    Approaching(Arc<Station>),
    /// "Next stop"
    Next(Arc<Station>),
    /// Nothing left ahead
    Terminus,
}

impl Headline {
    pub fn from_state(state: &NavigationState) -> Self {
        match state {
            NavigationState {
                arrived: true,
                current_station: Some(current),
                ..
            } => Self::Arrived(current.clone()),
            NavigationState {
                approaching: true,
                next_station: Some(next),
                ..
            } => Self::Approaching(next.clone()),
            NavigationState {
                next_station: Some(next),
                ..
            } => Self::Next(next.clone()),
            _ => Self::Terminus,
        }
    }

    pub fn station(&self) -> Option<&Arc<Station>> {
        match self {
            Self::Arrived(s) | Self::Approaching(s) | Self::Next(s) => Some(s),
            Self::Terminus => None,
        }
    }
}
