//! Poll-driven topics: a self-rescheduling fetch/retry loop per topic.
//!
//! Each [`PollTopic`] owns exactly one loop task, so there is never
//! more than one outstanding fetch or armed timer per topic. The loop
//! starts as a side effect of the first subscription and runs until
//! process shutdown, a hard failure from the source, or (when
//! configured) too many consecutive connection failures.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{error, info, warn};

use super::{Subscriber, Topic};
use crate::config::PollSettings;
use crate::notifier::Notifier;
use crate::shutdown::ShutdownSignal;

/// Transport-level outcome of one pull request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The source could not be reached; retried at the backoff interval.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The source answered with an error status; terminal for the topic.
    #[error("bad response: HTTP {code}")]
    Status { code: u16, body: String },
}

/// A pull source the poll loop fetches from.
#[async_trait]
pub trait PollSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Read-only liveness handle consumed by the watchdog.
#[derive(Clone)]
pub struct PollLiveness {
    name: &'static str,
    alive: Arc<AtomicBool>,
}

impl PollLiveness {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

/// A topic driven by this process's own recurring timer.
pub struct PollTopic<T> {
    topic: Topic<T>,
    source: Arc<dyn PollSource>,
    decode: fn(&str) -> crate::Result<T>,
    settings: PollSettings,
    notifier: Arc<dyn Notifier>,
    shutdown: ShutdownSignal,
    started: AtomicBool,
    alive: Arc<AtomicBool>,
}

impl<T: Send + Sync + 'static> PollTopic<T> {
    pub fn new(
        name: &'static str,
        source: Arc<dyn PollSource>,
        decode: fn(&str) -> crate::Result<T>,
        settings: PollSettings,
        notifier: Arc<dyn Notifier>,
        shutdown: ShutdownSignal,
    ) -> Arc<Self> {
        Arc::new(PollTopic {
            topic: Topic::new(name),
            source,
            decode,
            settings,
            notifier,
            shutdown,
            started: AtomicBool::new(false),
            alive: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn name(&self) -> &'static str {
        self.topic.name()
    }

    /// Registers an observer; the first subscription also starts the
    /// poll loop. Further subscriptions only register — one topic, one
    /// timer, however many call sites hold the handle.
    pub fn subscribe(self: &Arc<Self>, subscriber: Subscriber<T>) {
        self.topic.subscribe(subscriber);
        self.ensure_started();
    }

    pub fn subscriber_count(&self) -> usize {
        self.topic.subscriber_count()
    }

    /// Whether the poll loop is currently running.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Delivers an already-decoded message to subscribers, exactly as
    /// a successful fetch would.
    ///
    /// # Errors
    ///
    /// Propagates the first subscriber error, aborting the dispatch.
    pub async fn publish(&self, message: T) -> crate::Result<()> {
        self.topic.publish(message).await
    }

    /// Liveness handle for the watchdog.
    pub fn liveness(&self) -> PollLiveness {
        PollLiveness {
            name: self.topic.name(),
            alive: Arc::clone(&self.alive),
        }
    }

    fn ensure_started(self: &Arc<Self>) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        self.alive.store(true, Ordering::SeqCst);
        let topic = Arc::clone(self);
        tokio::spawn(async move {
            topic.run().await;
            topic.alive.store(false, Ordering::SeqCst);
        });
    }

    /// The fetch/retry loop.
    ///
    /// Success publishes and re-arms the timer for `update_interval`;
    /// a connection failure re-arms for the shorter `failure_retry`
    /// (once per failure — a success restores the normal cadence); an
    /// error status alerts and stops the topic for good. A body that
    /// fetched but failed to decode or publish costs only that cycle.
    async fn run(&self) {
        let name = self.topic.name();
        let mut shutdown = self.shutdown.clone();
        let mut consecutive_failures: u32 = 0;

        info!(topic = name, "Poll loop started");
        while !shutdown.is_triggered() {
            match self.source.fetch().await {
                Ok(body) => {
                    consecutive_failures = 0;
                    match (self.decode)(&body) {
                        Ok(message) => {
                            if let Err(e) = self.topic.publish(message).await {
                                error!(topic = name, error = %e, "Subscriber failed, cycle abandoned");
                            }
                        }
                        Err(e) => {
                            error!(topic = name, error = %e, "Failed to decode poll response");
                        }
                    }
                }
                Err(FetchError::Connection(reason)) => {
                    consecutive_failures += 1;
                    warn!(
                        topic = name,
                        consecutive_failures,
                        reason = %reason,
                        "Cannot reach source, retrying shortly"
                    );

                    if let Some(max) = self.settings.max_consecutive_failures
                        && consecutive_failures > max
                    {
                        error!(topic = name, max, "Retry budget exhausted, stopping topic");
                        self.notifier
                            .notify(
                                &format!("Polling stopped: {name}"),
                                &format!("{consecutive_failures} consecutive connection failures"),
                            )
                            .await;
                        return;
                    }

                    if self.pause(self.settings.failure_retry, &mut shutdown).await {
                        return;
                    }
                    continue;
                }
                Err(FetchError::Status { code, body }) => {
                    error!(topic = name, code, "Source returned error status, stopping topic");
                    self.notifier
                        .notify(&format!("Bad Response: HTTP {code}"), &body)
                        .await;
                    return;
                }
            }

            if self.pause(self.settings.update_interval, &mut shutdown).await {
                return;
            }
        }
    }

    /// Arms the next timer. Returns `true` when shutdown fired first.
    async fn pause(&self, interval: Duration, shutdown: &mut ShutdownSignal) -> bool {
        tokio::select! {
            () = sleep(interval) => false,
            () = shutdown.triggered() => {
                info!(topic = self.topic.name(), "Poll loop stopped");
                true
            }
        }
    }
}
