//! Periodic liveness check over the poll timers and storage writes.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::WatchdogSettings;
use crate::notifier::Notifier;
use crate::shutdown::ShutdownSignal;
use crate::stats::StatsAccumulator;
use crate::topic::poll::PollLiveness;

/// Alerts when a poll loop dies or storage goes quiet for too long.
///
/// Pure reads: poll liveness flags and the stats clock are observed,
/// never mutated.
pub struct Watchdog {
    timers: Vec<PollLiveness>,
    stats: Arc<StatsAccumulator>,
    notifier: Arc<dyn Notifier>,
    settings: WatchdogSettings,
    shutdown: ShutdownSignal,
    started_at: Instant,
}

impl Watchdog {
    pub fn new(
        timers: Vec<PollLiveness>,
        stats: Arc<StatsAccumulator>,
        notifier: Arc<dyn Notifier>,
        settings: WatchdogSettings,
        shutdown: ShutdownSignal,
    ) -> Self {
        Watchdog {
            timers,
            stats,
            notifier,
            settings,
            shutdown,
            started_at: Instant::now(),
        }
    }

    /// Checks every `check_interval` until shutdown.
    pub async fn run(self) {
        let mut shutdown = self.shutdown.clone();
        loop {
            tokio::select! {
                () = sleep(self.settings.check_interval) => {}
                () = shutdown.triggered() => {
                    debug!("Watchdog stopped");
                    return;
                }
            }
            self.check().await;
        }
    }

    /// One evaluation pass, also exercised directly by tests.
    pub async fn check(&self) {
        for timer in &self.timers {
            if !timer.is_alive() {
                warn!(topic = timer.name(), "Poll timer is no longer running");
                self.notifier
                    .notify(
                        &format!("Poll timer dead: {}", timer.name()),
                        "the topic stopped polling and will not recover without a restart",
                    )
                    .await;
            }
        }

        // Before the first write, staleness counts from process start.
        let idle = self
            .stats
            .since_last_write()
            .unwrap_or_else(|| self.started_at.elapsed());
        if idle > self.settings.stale_after {
            warn!(idle_secs = idle.as_secs(), "Storage writes are stale");
            self.notifier
                .notify(
                    "Storage writes stalled",
                    &format!("no write for {}s", idle.as_secs()),
                )
                .await;
        }
    }
}
