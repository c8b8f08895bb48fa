//! PhoneSyncer: periodic polling of the telephony service
//!
//! Runs in a background tokio task. Refreshes the coordinator on a fixed
//! interval, and early whenever a command asked for it. A failed poll is not
//! retried; the next tick is the retry.

use std::sync::Arc;

use tokio::time::{self, Duration, MissedTickBehavior};

use crate::phone::Coordinator;

/// Background synchronization service
pub struct PhoneSyncer {
    coordinator: Arc<Coordinator>,
    interval: Duration,
}

impl PhoneSyncer {
    pub fn new(coordinator: Arc<Coordinator>, interval: Duration) -> Self {
        Self {
            coordinator,
            interval,
        }
    }

    /// Start the background sync loop (runs forever)
    pub async fn start(self: Arc<Self>) {
        tracing::info!(
            "[PhoneSync] Starting background sync (interval: {}s)",
            self.interval.as_secs()
        );

        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.coordinator.refresh_requested() => {
                    tracing::debug!("[PhoneSync] Refresh requested");
                    ticker.reset();
                }
            }

            self.sync().await;
        }
    }

    async fn sync(&self) {
        match self.coordinator.refresh().await {
            Ok(snapshot) => tracing::debug!(
                "[PhoneSync] Synced: {} active calls, {} history, {} groups, {} broadcasts",
                snapshot.active_calls.len(),
                snapshot.call_history.len(),
                snapshot.groups.len(),
                snapshot.broadcasts.len()
            ),
            Err(e) => tracing::debug!("[PhoneSync] Sync failed: {}", e),
        }
    }
}
