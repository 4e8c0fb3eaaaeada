//! Periodic refresh of the live entries feed.

use std::sync::Arc;
use std::time::Duration;

use messgate_core::LiveEntries;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::api::GateApi;
use crate::error::ClientError;

/// Refresh period used by the admin feed.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest accepted refresh period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a running poll loop. Dropping it stops the loop.
#[derive(Debug)]
pub struct LivePoller {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl LivePoller {
    /// Fetches immediately, then every `interval`, handing each result to `sink`.
    ///
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it. Must be called
    /// within a Tokio runtime.
    pub fn spawn<A, F>(api: Arc<A>, interval: Duration, mut sink: F) -> Self
    where
        A: GateApi + ?Sized + 'static,
        F: FnMut(Result<LiveEntries, ClientError>) + Send + 'static,
    {
        let period = interval.max(MIN_POLL_INTERVAL);
        let (shutdown, mut shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let result = api.live_entries().await;
                        match &result {
                            Ok(feed) => debug!(entries = feed.entries.len(), total = feed.total_entries, "live entries refreshed"),
                            Err(e) => warn!(error = %e, "live entries refresh failed"),
                        }
                        sink(result);
                    }
                }
            }
            debug!("live entries poller stopped");
        });
        Self {
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// True until the loop has exited.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the loop and waits for an in-progress fetch to be handed off.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for LivePoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
