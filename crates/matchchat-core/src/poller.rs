//! Recurring fetch timer, scoped to the lifetime of a mounted panel.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::info;

use crate::panel::ChatPanel;

/// Polls a panel every `period` until stopped or dropped.
///
/// Each tick spawns its own fetch, so a request slower than the period
/// overlaps with the next one. Stopping the timer does not cancel fetches
/// already in flight.
pub struct Poller {
    handle: Option<JoinHandle<()>>,
    period: Duration,
}

impl Poller {
    /// Start polling. The first fetch happens one full period from now.
    pub fn start(panel: Arc<ChatPanel>, period: Duration) -> Self {
        info!(
            "Polling match {} every {}ms",
            panel.match_id(),
            period.as_millis()
        );

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let panel = Arc::clone(&panel);
                tokio::spawn(async move {
                    panel.poll().await;
                });
            }
        });

        Self {
            handle: Some(handle),
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Polling stopped");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
