//! Pluggable topology fetching.
//!
//! Collaborators implement this to load line topology from a station API,
//! a local cache, or a file. Retry and caching policy belong to the
//! implementation.

use std::future::Future;
use std::pin::Pin;

use crate::identifiers::*;
use crate::models::station::Line;
use crate::models::types::Result;

pub trait TopologyFetcher: Send + Sync {
    /// Ordered stations of a line, with pass flags for the selected service
    fn fetch_line<'a>(
        &'a self,
        line_id: &'a LineIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Line>> + Send + 'a>>;

    /// Every line serving a station
    fn fetch_lines_at<'a>(
        &'a self,
        station_id: &'a StationIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Line>>> + Send + 'a>>;
}
