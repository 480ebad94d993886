//! # trainlcd-core
//!
//! Resolves where a train is along its line from periodic GPS fixes and
//! classifies that into the small state a passenger display needs:
//! current station, next station, arrived, approaching.
//!
//! The pipeline is pure per fix ([`navigation::scoring`],
//! [`navigation::spacing`], [`navigation::threshold`],
//! [`navigation::next_stations`]); only [`navigation::PositionTracker`]
//! owns mutable state, and [`driver`] feeds it from an async fix stream.

pub mod driver;
pub mod location;
pub mod navigation;

// Re-export transit from the transit crate
pub use trainlcd_transit as transit;

pub use location::{GeoFix, LocationError};
pub use navigation::{EngineConfig, Headline, NavigationError, NavigationState, PositionTracker};
