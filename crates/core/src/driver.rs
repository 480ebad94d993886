//! Feeds a location subscription into a [`PositionTracker`].
//!
//! Fixes are consumed strictly one at a time: the next item is not polled
//! until the previous one is fully classified. Dropping the stream (or
//! aborting the spawned task) is the unsubscribe.

use futures_core::Stream;
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use crate::location::{GeoFix, LocationError};
use crate::navigation::{NavigationState, PositionTracker};

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    State(NavigationState),
    LocationFailed(LocationError),
}

/// Drives `tracker` until the stream ends, reporting every outcome to
/// `on_event`. Returns the number of fixes processed.
pub async fn track<S, F>(fixes: S, tracker: &mut PositionTracker, mut on_event: F) -> usize
where
    S: Stream<Item = Result<GeoFix, LocationError>>,
    F: FnMut(TrackerEvent),
{
    let mut fixes = std::pin::pin!(fixes);
    let mut processed = 0;

    while let Some(item) = fixes.next().await {
        match tracker.handle(item) {
            Ok(state) => {
                processed += 1;
                on_event(TrackerEvent::State(state));
            }
            Err(e) => on_event(TrackerEvent::LocationFailed(e)),
        }
    }

    debug!(processed, "location stream ended");
    processed
}

/// A tracker running on its own task
pub struct TrackerHandle {
    /// Latest state; marked changed on every processed fix, even when equal
    pub states: watch::Receiver<NavigationState>,
    pub errors: mpsc::UnboundedReceiver<LocationError>,
    task: JoinHandle<PositionTracker>,
}

impl TrackerHandle {
    /// Stops processing; fixes still queued in the stream are dropped
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Waits for the stream to end and hands the tracker back
    pub async fn join(self) -> Result<PositionTracker, JoinError> {
        self.task.await
    }
}

pub fn spawn_tracker<S>(mut tracker: PositionTracker, fixes: S) -> TrackerHandle
where
    S: Stream<Item = Result<GeoFix, LocationError>> + Send + 'static,
{
    let (states_tx, states) = watch::channel(tracker.state().clone());
    let (errors_tx, errors) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        track(fixes, &mut tracker, |event| match event {
            TrackerEvent::State(state) => {
                states_tx.send_replace(state);
            }
            TrackerEvent::LocationFailed(e) => {
                // Nobody listening for errors is fine
                let _ = errors_tx.send(e);
            }
        })
        .await;
        tracker
    });

    TrackerHandle {
        states,
        errors,
        task,
    }
}
