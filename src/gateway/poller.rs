//! Live satellite position polling.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, info};

use crate::feeds::PositionSource;
use crate::types::SatellitePosition;

/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Background task fetching the satellite position at a fixed interval.
///
/// The first fetch happens immediately. Failed polls are skipped and the
/// last good position stays published. Positions never touch the cache.
///
/// The task stops when the handle is cancelled or dropped, so a consumer
/// tearing down its view cannot leak a pending timer.
pub struct SatellitePoller {
    latest: watch::Receiver<Option<SatellitePosition>>,
    task: JoinHandle<()>,
}

impl SatellitePoller {
    /// Start polling `source` every `interval`, clamped to at least
    /// [`MIN_POLL_INTERVAL`]. Must be called within a tokio runtime.
    pub fn spawn(source: Arc<dyn PositionSource>, interval: Duration) -> Self {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (tx, rx) = watch::channel(None);

        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(timer);

        let task = tokio::spawn(async move {
            info!(interval_ms = interval.as_millis() as u64, "satellite poller started");
            while ticks.next().await.is_some() {
                match source.position().await {
                    Ok(position) => {
                        if tx.send(Some(position)).is_err() {
                            break;
                        }
                    }
                    Err(e) => debug!(error = %e, "satellite poll failed, keeping last position"),
                }
            }
        });

        Self { latest: rx, task }
    }

    /// Most recent position, if any poll has succeeded yet.
    pub fn latest(&self) -> Option<SatellitePosition> {
        self.latest.borrow().clone()
    }

    /// A receiver notified on every new position.
    pub fn subscribe(&self) -> watch::Receiver<Option<SatellitePosition>> {
        self.latest.clone()
    }

    /// Wait for the next successful poll. `None` once the poller has stopped.
    pub async fn changed(&mut self) -> Option<SatellitePosition> {
        self.latest.changed().await.ok()?;
        self.latest.borrow_and_update().clone()
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop polling.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for SatellitePoller {
    fn drop(&mut self) {
        self.task.abort();
        info!("satellite poller stopped");
    }
}
