//! # trainlcd-transit
//!
//! Rail topology model shared by the position-resolution engine and the
//! collaborators that fetch line data.
//!
//! ## Features
//!
//! - **Ordered topology**: a [`Line`] owns its stations in one canonical
//!   physical order, regardless of the direction a train travels
//! - **Geodesic queries**: haversine distances in meters over `geo` points
//! - **Spatial lookup**: R-tree backed nearest-station queries for picking
//!   a line before any station is known
//! - **Pluggable fetching**: implement [`TopologyFetcher`] to load lines
//!   from wherever they live
//!
//! ## Example
//!
//! ```
//! use trainlcd_transit::prelude::*;
//! use geo::Point;
//!
//! let shibuya = Station::builder("1130205", "Shibuya", Point::new(139.7016, 35.6580)).build();
//! let harajuku = Station::builder("1130204", "Harajuku", Point::new(139.7027, 35.6702)).build();
//!
//! let line = Line::new("11302", "Yamanote", LineType::Normal, true, vec![shibuya, harajuku]);
//! let provider = StaticTopologyProvider::from_lines(vec![line]);
//!
//! let near_shibuya = Point::new(139.7010, 35.6590);
//! let nearest = provider.nearest_stations(near_shibuya, 1);
//! assert_eq!(nearest[0].name.as_ref(), "Shibuya");
//! ```

pub mod identifiers;
pub mod models;
pub mod network;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{station::*, traits::*, types::*};
    pub use crate::network::traits::*;
    pub use crate::provider::static_provider::StaticTopologyProvider;
}

pub use prelude::*;
