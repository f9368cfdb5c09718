//! Periodic liveness sweep task with explicit start/stop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ports::ConfigStore;
use crate::services::liveness::LivenessTracker;

/// Default period between sweep passes.
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(10);

/// Handle to the background sweep task.
///
/// The task runs for the process lifetime unless [`stop`](Self::stop) is
/// called, which signals the loop and waits for it with a bounded join —
/// the task is never left running after the owning service reports
/// stopped.
pub struct StatusMonitor {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl StatusMonitor {
    /// Spawn the sweep loop over the given tracker.
    pub fn start<S>(tracker: Arc<LivenessTracker<S>>, period: Duration) -> Self
    where
        S: ConfigStore + Send + Sync + 'static,
    {
        let (shutdown, mut stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            tracing::info!(period_secs = period.as_secs(), "status monitor started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // Sweep failures are logged and the loop keeps
                        // running; a broken store read must not kill the
                        // monitor.
                        if let Err(err) = tracker.sweep().await {
                            tracing::error!(error = %err, "liveness sweep failed");
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("status monitor stopped");
        });

        Self { shutdown, handle }
    }

    /// Signal the loop to stop and wait for it, bounded at five seconds.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        match tokio::time::timeout(Duration::from_secs(5), self.handle).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::error!(error = %err, "status monitor task panicked"),
            Err(_) => tracing::warn!("status monitor did not stop within 5s"),
        }
    }
}
