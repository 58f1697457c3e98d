//! Shared test doubles: a scripted poll source, a recording notifier,
//! and subscriber helpers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use magpie::config::PollSettings;
use magpie::notifier::Notifier;
use magpie::topic::Subscriber;
use magpie::topic::poll::{FetchError, PollSource};

/// A well-formed ticker poll body.
pub const TICKER_BODY: &str = r#"{
    "high": "105.00",
    "low": "95.00",
    "vwap": "101.00",
    "volume": "1000.00",
    "timestamp": "1700000000"
}"#;

/// Replays a fixed sequence of fetch outcomes, then blocks forever.
///
/// Blocking at exhaustion keeps the poll loop parked inside `fetch`
/// instead of burning further cycles, so tests observe exactly the
/// scripted behavior. Fetch instants are recorded on the (possibly
/// paused) tokio clock.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<String, FetchError>>>,
    fetched_at: Mutex<Vec<tokio::time::Instant>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<String, FetchError>>) -> Arc<Self> {
        Arc::new(ScriptedSource {
            responses: Mutex::new(responses.into()),
            fetched_at: Mutex::new(Vec::new()),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched_at.lock().unwrap().len()
    }

    pub fn fetch_instants(&self) -> Vec<tokio::time::Instant> {
        self.fetched_at.lock().unwrap().clone()
    }
}

#[async_trait]
impl PollSource for ScriptedSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        self.fetched_at
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(outcome) => outcome,
            None => std::future::pending().await,
        }
    }
}

/// Captures alerts and forwards them on a channel for awaiting.
pub struct RecordingNotifier {
    alerts: Mutex<Vec<(String, String)>>,
    tx: mpsc::UnboundedSender<(String, String)>,
}

impl RecordingNotifier {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<(String, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(RecordingNotifier {
                alerts: Mutex::new(Vec::new()),
                tx,
            }),
            rx,
        )
    }

    pub fn alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subject: &str, message: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((subject.to_string(), message.to_string()));
        let _ = self.tx.send((subject.to_string(), message.to_string()));
    }
}

/// A subscriber that forwards every delivery onto a channel.
pub fn forwarding_subscriber<T: Send + Sync + 'static>(
    tx: mpsc::UnboundedSender<Arc<T>>,
) -> Subscriber<T> {
    Box::new(move |message| {
        let tx = tx.clone();
        Box::pin(async move {
            let _ = tx.send(message);
            Ok(())
        })
    })
}

/// Poll settings with the given timings; the URL is unused because the
/// scripted source ignores it.
pub fn poll_settings(
    update_secs: u64,
    retry_secs: u64,
    max_consecutive_failures: Option<u32>,
) -> PollSettings {
    PollSettings {
        url: String::new(),
        update_interval: Duration::from_secs(update_secs),
        failure_retry: Duration::from_secs(retry_secs),
        max_consecutive_failures,
    }
}

/// Polls `cond` on the tokio clock until it holds.
pub async fn wait_for(mut cond: impl FnMut() -> bool) {
    for _ in 0..2000 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("condition not met in time");
}
