//! GPS fixes as delivered by the device location collaborator.

use chrono::{DateTime, Utc};
use geo::Point;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("timed out waiting for a position")]
    Timeout,

    #[error("invalid coordinate lat={latitude} lon={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}

/// One timestamped GPS sample
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFix {
    /// x = longitude, y = latitude, decimal degrees
    pub location: Point,
    /// Horizontal accuracy radius reported by the device, meters
    pub accuracy_m: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl GeoFix {
    pub fn new(
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, LocationError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(LocationError::InvalidCoordinate { latitude, longitude });
        }

        Ok(Self {
            location: Point::new(longitude, latitude),
            accuracy_m: None,
            timestamp,
        })
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }
}
