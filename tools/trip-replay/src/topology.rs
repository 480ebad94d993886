//! Topology file loading.
//!
//! The file is a JSON document holding every line the replay may use:
//!
//! ```json
//! { "lines": [ { "id": "11302", "name": "Yamanote", "line_type": "normal",
//!                "loop": true, "stations": [ ... ] } ] }
//! ```

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use anyhow::{Context, Result};
use geo::Point;
use serde::Deserialize;
use trainlcd_transit::{
    Line, LineIdentifier, LineType, Station, StationIdentifier, StationNumbering,
    StaticTopologyProvider, TopologyFetcher, TopologyProvider, TransitError,
};

#[derive(Debug, Deserialize)]
pub struct TopologyFile {
    pub lines: Vec<LineRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub line_type: LineType,
    #[serde(default, rename = "loop")]
    pub is_loop: bool,
    pub stations: Vec<StationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    pub id: String,
    /// Defaults to `id`
    pub group_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub name_katakana: String,
    #[serde(default)]
    pub name_roman: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub numbering: Vec<String>,
    #[serde(default)]
    pub pass: bool,
    #[serde(default)]
    pub junction: bool,
}

impl StationRecord {
    fn to_station(&self) -> Station {
        let mut numbers = self.numbering.iter().map(|n| n.as_str().into());
        let numbering = StationNumbering {
            primary: numbers.next(),
            secondary: numbers.next(),
            extra: numbers.next(),
        };

        Station::builder(self.id.as_str(), &self.name, Point::new(self.longitude, self.latitude))
            .group(self.group_id.as_deref().unwrap_or(&self.id))
            .name_katakana(&self.name_katakana)
            .name_roman(&self.name_roman)
            .numbering(numbering)
            .pass(self.pass)
            .junction(self.junction)
            .build()
    }
}

impl LineRecord {
    pub fn to_line(&self) -> Line {
        Line::new(
            self.id.as_str(),
            &self.name,
            self.line_type,
            self.is_loop,
            self.stations.iter().map(StationRecord::to_station).collect(),
        )
    }
}

/// Serves lines out of a topology file already read into memory
pub struct FileTopology {
    records: Vec<LineRecord>,
    provider: StaticTopologyProvider,
}

impl FileTopology {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read topology file {}", path.display()))?;
        let file: TopologyFile = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse topology file {}", path.display()))?;

        tracing::info!("Loaded {} lines from {}", file.lines.len(), path.display());
        Ok(Self::from_records(file.lines))
    }

    pub fn from_records(records: Vec<LineRecord>) -> Self {
        let provider =
            StaticTopologyProvider::from_lines(records.iter().map(LineRecord::to_line).collect());
        Self { records, provider }
    }

    pub fn provider(&self) -> &StaticTopologyProvider {
        &self.provider
    }
}

impl TopologyFetcher for FileTopology {
    fn fetch_line<'a>(
        &'a self,
        line_id: &'a LineIdentifier,
    ) -> Pin<Box<dyn Future<Output = trainlcd_transit::Result<Line>> + Send + 'a>> {
        Box::pin(async move {
            self.records
                .iter()
                .find(|r| r.id == line_id.as_str())
                .map(LineRecord::to_line)
                .ok_or_else(|| TransitError::LineNotFound(line_id.clone()))
        })
    }

    fn fetch_lines_at<'a>(
        &'a self,
        station_id: &'a StationIdentifier,
    ) -> Pin<Box<dyn Future<Output = trainlcd_transit::Result<Vec<Line>>> + Send + 'a>> {
        Box::pin(async move {
            let lines: Vec<Line> = self
                .provider
                .lines_at(station_id)
                .iter()
                .map(|l| Line::clone(l))
                .collect();
            if lines.is_empty() {
                return Err(TransitError::StationNotFound(station_id.clone()));
            }
            Ok(lines)
        })
    }
}
