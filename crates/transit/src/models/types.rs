//! Core enums and errors for rail topology.

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Kind of service a line carries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum LineType {
    #[default]
    Normal = 0,
    BulletTrain = 1,
    Subway = 2,
    Tram = 3,
    MonorailOrAgt = 4,
    Other = 5,
}

impl LineType {
    /// High-speed lines have sparse stations and long braking distances
    pub fn is_high_speed(self) -> bool {
        matches!(self, Self::BulletTrain)
    }
}

/// Direction of travel along a line.
///
/// Stations are stored in one canonical physical order. On ordinary lines
/// `Inbound` walks that order forward and `Outbound` walks it backward; on
/// loop lines the convention flips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    /// Whether travel follows increasing station index
    pub fn is_ascending(self, is_loop: bool) -> bool {
        match (self, is_loop) {
            (Self::Outbound, true) | (Self::Inbound, false) => true,
            (Self::Inbound, true) | (Self::Outbound, false) => false,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Inbound => Self::Outbound,
            Self::Outbound => Self::Inbound,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            other => Err(TransitError::InvalidData(format!(
                "unknown direction {other:?}, expected inbound or outbound"
            ))),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Station not found: {0}")]
    StationNotFound(StationIdentifier),

    #[error("Line not found: {0}")]
    LineNotFound(LineIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_ascending_flips_on_loop_lines() {
        assert!(Direction::Inbound.is_ascending(false));
        assert!(!Direction::Outbound.is_ascending(false));
        assert!(Direction::Outbound.is_ascending(true));
        assert!(!Direction::Inbound.is_ascending(true));
        assert_eq!(Direction::Inbound.reversed(), Direction::Outbound);
        assert!(Direction::Outbound.reversed().is_ascending(false));
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("INBOUND".parse::<Direction>().unwrap(), Direction::Inbound);
        assert_eq!("outbound".parse::<Direction>().unwrap(), Direction::Outbound);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_only_bullet_train_is_high_speed() {
        assert!(LineType::BulletTrain.is_high_speed());
        assert!(!LineType::Normal.is_high_speed());
        assert!(!LineType::Subway.is_high_speed());
    }
}
