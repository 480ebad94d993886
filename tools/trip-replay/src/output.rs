//! Text rendering of replay events.

use trainlcd_core::driver::TrackerEvent;
use trainlcd_core::transit::Station;
use trainlcd_core::{Headline, NavigationState};

fn label(station: &Station) -> String {
    let number = station.full_station_number();
    if number.is_empty() {
        station.name.to_string()
    } else {
        format!("{} {}", station.name, number)
    }
}

pub fn headline_text(state: &NavigationState) -> String {
    match state.headline() {
        Headline::Arrived(s) => format!("Now stopping at {}", label(&s)),
        Headline::Approaching(s) => format!("Arriving soon at {}", label(&s)),
        Headline::Next(s) => format!("Next {}", label(&s)),
        Headline::Terminus => "Terminus".to_owned(),
    }
}

pub fn event_line(seq: usize, event: &TrackerEvent) -> String {
    match event {
        TrackerEvent::State(state) => format!(
            "#{seq:<4} current={:<16} next={:<16} {}",
            state
                .current_station
                .as_ref()
                .map_or("-".to_owned(), |s| s.name.to_string()),
            state
                .next_station
                .as_ref()
                .map_or("-".to_owned(), |s| s.name.to_string()),
            headline_text(state),
        ),
        TrackerEvent::LocationFailed(e) => format!("#{seq:<4} location error: {e}"),
    }
}
