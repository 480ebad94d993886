//! Recorded location log.
//!
//! A JSON array where each entry is either a fix or a recorded device error:
//!
//! ```json
//! [
//!   { "latitude": 35.658, "longitude": 139.7016, "timestamp": "2026-04-01T08:00:00Z" },
//!   { "error": "timeout" }
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use trainlcd_core::{GeoFix, LocationError};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixRecord {
    Fix {
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
        accuracy: Option<f64>,
    },
    Error {
        error: String,
    },
}

impl FixRecord {
    fn into_item(self) -> Result<GeoFix, LocationError> {
        match self {
            Self::Fix {
                latitude,
                longitude,
                timestamp,
                accuracy,
            } => {
                let fix = GeoFix::new(latitude, longitude, timestamp)?;
                Ok(match accuracy {
                    Some(accuracy) => fix.with_accuracy(accuracy),
                    None => fix,
                })
            }
            Self::Error { error } => Err(match error.as_str() {
                "permission_denied" => LocationError::PermissionDenied,
                "timeout" => LocationError::Timeout,
                _ => LocationError::PositionUnavailable(error),
            }),
        }
    }
}

pub fn parse_fix_log(text: &str) -> Result<Vec<Result<GeoFix, LocationError>>> {
    let records: Vec<FixRecord> = serde_json::from_str(text).context("Invalid fix log")?;
    Ok(records.into_iter().map(FixRecord::into_item).collect())
}

pub fn load_fix_log(path: &Path) -> Result<Vec<Result<GeoFix, LocationError>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fix log {}", path.display()))?;
    let items = parse_fix_log(&text).with_context(|| format!("In {}", path.display()))?;

    tracing::info!("Loaded {} fix log entries", items.len());
    Ok(items)
}
