//! Arrived / approaching distance thresholds.
//!
//! Both thresholds scale with the line's average station spacing, clamped
//! to a floor and a ceiling, so dense urban lines and sparse suburban lines
//! classify with the same policy. High-speed lines multiply both.

use serde::Deserialize;
use trainlcd_transit::LineType;

use crate::navigation::error::{NavigationError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub arrived_m: f64,
    pub approaching_m: f64,
}

/// Tunables of the threshold policy.
///
/// [`ThresholdConfig::validate`] guarantees `arrived_m < approaching_m` for
/// every spacing, and that both are non-decreasing in the spacing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Fraction of the average spacing counted as "at the station"
    pub arrived_ratio: f64,
    pub arrived_min_m: f64,
    pub arrived_max_m: f64,
    /// Fraction of the average spacing counted as "arriving soon"
    pub approaching_ratio: f64,
    pub approaching_min_m: f64,
    pub approaching_max_m: f64,
    /// Applied to both thresholds on high-speed lines
    pub high_speed_factor: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            arrived_ratio: 0.2,
            arrived_min_m: 100.0,
            arrived_max_m: 500.0,
            approaching_ratio: 0.5,
            approaching_min_m: 300.0,
            approaching_max_m: 2_000.0,
            high_speed_factor: 2.0,
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.arrived_ratio,
            self.arrived_min_m,
            self.arrived_max_m,
            self.approaching_ratio,
            self.approaching_min_m,
            self.approaching_max_m,
            self.high_speed_factor,
        ];
        if all.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(invalid("all threshold parameters must be finite and positive"));
        }
        if self.arrived_min_m > self.arrived_max_m
            || self.approaching_min_m > self.approaching_max_m
        {
            return Err(invalid("threshold floor above its ceiling"));
        }
        // Each arrived parameter strictly below its approaching counterpart
        // keeps arrived < approaching across the whole clamp range
        if self.arrived_ratio >= self.approaching_ratio
            || self.arrived_min_m >= self.approaching_min_m
            || self.arrived_max_m >= self.approaching_max_m
        {
            return Err(invalid("arrived parameters must be below approaching parameters"));
        }
        if self.high_speed_factor < 1.0 {
            return Err(invalid("high_speed_factor must not shrink thresholds"));
        }
        Ok(())
    }

    pub fn thresholds(&self, line_type: LineType, average_spacing_m: f64) -> Thresholds {
        let spacing = if average_spacing_m.is_finite() {
            average_spacing_m.max(0.0)
        } else {
            0.0
        };
        let factor = if line_type.is_high_speed() {
            self.high_speed_factor
        } else {
            1.0
        };

        Thresholds {
            arrived_m: factor
                * (spacing * self.arrived_ratio)
                    .max(self.arrived_min_m)
                    .min(self.arrived_max_m),
            approaching_m: factor
                * (spacing * self.approaching_ratio)
                    .max(self.approaching_min_m)
                    .min(self.approaching_max_m),
        }
    }
}

fn invalid(reason: &str) -> NavigationError {
    NavigationError::InvalidConfig(reason.to_owned())
}
