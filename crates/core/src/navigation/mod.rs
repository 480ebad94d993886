//! Position-resolution engine.

pub mod error;
pub mod headline;
pub mod next_stations;
pub mod scoring;
pub mod spacing;
pub mod threshold;
pub mod tracker;

pub use error::NavigationError;
pub use headline::Headline;
pub use next_stations::{bound_station, next_stations};
pub use scoring::{ScoredStation, score_stations};
pub use spacing::average_spacing;
pub use threshold::{ThresholdConfig, Thresholds};
pub use tracker::{EngineConfig, NavigationState, PositionTracker};
