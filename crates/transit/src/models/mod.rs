//! Topology models, types, and traits.

pub mod station;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use station::{Line, Station, StationBuilder, StationNumbering};
pub use traits::TopologyProvider;
pub use types::{Direction, LineType, Result, TransitError};
