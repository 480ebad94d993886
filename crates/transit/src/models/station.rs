//! Stations and lines.
//!
//! A [`Line`] is an arena: its stations live in one `Vec` in canonical
//! physical order and everything downstream refers to them by index.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::*;
use crate::models::types::LineType;

/// Display numbering of a station (e.g. "JY20"). Never used for logic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StationNumbering {
    pub primary: Option<Arc<str>>,
    pub secondary: Option<Arc<str>>,
    pub extra: Option<Arc<str>>,
}

impl StationNumbering {
    /// Formats as `(JY20/F15/Z01)`, dropping trailing missing parts.
    ///
    /// An extra number is only shown together with the secondary one, and the
    /// secondary one only together with the primary one.
    pub fn full(&self) -> String {
        match (&self.primary, &self.secondary, &self.extra) {
            (Some(p), Some(s), Some(e)) => format!("({p}/{s}/{e})"),
            (Some(p), Some(s), None) => format!("({p}/{s})"),
            (Some(p), None, _) => format!("({p})"),
            (None, _, _) => String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub id: StationIdentifier,
    /// Shared by every occurrence of the same physical station, including
    /// junction duplicates belonging to adjacent segments
    pub group_id: StationGroupIdentifier,
    pub name: Arc<str>,
    pub name_katakana: Arc<str>,
    pub name_roman: Arc<str>,
    /// x = longitude, y = latitude
    pub location: Point,
    pub numbering: StationNumbering,
    /// The selected service runs through without stopping
    pub pass: bool,
    pub junction: bool,
}

impl Station {
    pub fn builder(
        id: impl Into<StationIdentifier>,
        name: impl AsRef<str>,
        location: Point,
    ) -> StationBuilder {
        let id = id.into();
        StationBuilder {
            station: Station {
                group_id: StationGroupIdentifier::new(id.as_str()),
                id,
                name: name.as_ref().into(),
                name_katakana: "".into(),
                name_roman: "".into(),
                location,
                numbering: StationNumbering::default(),
                pass: false,
                junction: false,
            },
        }
    }

    pub fn full_station_number(&self) -> String {
        self.numbering.full()
    }

    /// Same physical station, possibly listed under another segment
    pub fn is_same_group(&self, other: &Station) -> bool {
        self.group_id == other.group_id
    }

    /// The other occurrence of a junction station duplicated across two
    /// adjacent segments
    pub fn is_junction_twin(&self, other: &Station) -> bool {
        self.id != other.id && (self.junction || other.junction) && self.is_same_group(other)
    }
}

#[derive(Clone)]
pub struct StationBuilder {
    station: Station,
}

impl StationBuilder {
    pub fn group(mut self, group_id: impl Into<StationGroupIdentifier>) -> Self {
        self.station.group_id = group_id.into();
        self
    }

    pub fn name_katakana(mut self, name: impl AsRef<str>) -> Self {
        self.station.name_katakana = name.as_ref().into();
        self
    }

    pub fn name_roman(mut self, name: impl AsRef<str>) -> Self {
        self.station.name_roman = name.as_ref().into();
        self
    }

    pub fn numbering(mut self, numbering: StationNumbering) -> Self {
        self.station.numbering = numbering;
        self
    }

    pub fn pass(mut self, pass: bool) -> Self {
        self.station.pass = pass;
        self
    }

    pub fn junction(mut self, junction: bool) -> Self {
        self.station.junction = junction;
        self
    }

    pub fn build(self) -> Station {
        self.station
    }
}

/// Ordered topology of one line for the selected service
#[derive(Clone, Debug)]
pub struct Line {
    pub id: LineIdentifier,
    pub name: Arc<str>,
    pub line_type: LineType,
    /// Circular line: travel wraps from the last index back to the first
    pub is_loop: bool,
    stations: Vec<Arc<Station>>,
}

impl Line {
    pub fn new(
        id: impl Into<LineIdentifier>,
        name: impl AsRef<str>,
        line_type: LineType,
        is_loop: bool,
        stations: Vec<Station>,
    ) -> Self {
        Self::from_shared(
            id,
            name,
            line_type,
            is_loop,
            stations.into_iter().map(Arc::new).collect(),
        )
    }

    pub fn from_shared(
        id: impl Into<LineIdentifier>,
        name: impl AsRef<str>,
        line_type: LineType,
        is_loop: bool,
        stations: Vec<Arc<Station>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.as_ref().into(),
            line_type,
            is_loop,
            stations,
        }
    }

    pub fn stations(&self) -> &[Arc<Station>] {
        &self.stations
    }

    pub fn station(&self, index: usize) -> Option<&Arc<Station>> {
        self.stations.get(index)
    }

    /// Arena index of the first occurrence of `id`
    pub fn position_of(&self, id: &StationIdentifier) -> Option<usize> {
        self.stations.iter().position(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
