//! Watchdog alerting tests: dead poll timers and stale storage writes.

mod common;

use std::sync::Arc;
use std::time::Duration;

use magpie::config::WatchdogSettings;
use magpie::models::ticker;
use magpie::shutdown::Shutdown;
use magpie::stats::StatsAccumulator;
use magpie::topic::poll::{FetchError, PollSource, PollTopic};
use magpie::watchdog::Watchdog;

use common::{RecordingNotifier, ScriptedSource, forwarding_subscriber, poll_settings, wait_for};

fn settings(stale_secs: u64) -> WatchdogSettings {
    WatchdogSettings {
        check_interval: Duration::from_secs(60),
        stale_after: Duration::from_secs(stale_secs),
    }
}

#[tokio::test]
async fn healthy_timers_and_fresh_writes_raise_nothing() {
    let source = ScriptedSource::new(vec![]);
    let (topic_notifier, _) = RecordingNotifier::new();
    let shutdown = Shutdown::new();
    let topic = PollTopic::new(
        "ticker",
        Arc::clone(&source) as Arc<dyn PollSource>,
        ticker::decode,
        poll_settings(20, 2, None),
        topic_notifier,
        shutdown.signal(),
    );
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    topic.subscribe(forwarding_subscriber(tx));

    let stats = Arc::new(StatsAccumulator::new());
    stats.increment(1, 1);

    let (notifier, _) = RecordingNotifier::new();
    let watchdog = Watchdog::new(
        vec![topic.liveness()],
        stats,
        notifier.clone(),
        settings(180),
        shutdown.signal(),
    );

    watchdog.check().await;
    assert!(notifier.alerts().is_empty());
}

#[tokio::test]
async fn dead_poll_timer_is_reported() {
    let source = ScriptedSource::new(vec![Err(FetchError::Status {
        code: 500,
        body: "boom".into(),
    })]);
    let (topic_notifier, _) = RecordingNotifier::new();
    let shutdown = Shutdown::new();
    let topic = PollTopic::new(
        "transactions",
        Arc::clone(&source) as Arc<dyn PollSource>,
        magpie::models::transaction::decode_list,
        poll_settings(60, 2, None),
        topic_notifier,
        shutdown.signal(),
    );
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    topic.subscribe(forwarding_subscriber(tx));
    wait_for(|| !topic.is_alive()).await;

    let stats = Arc::new(StatsAccumulator::new());
    stats.increment(1, 1);

    let (notifier, _) = RecordingNotifier::new();
    let watchdog = Watchdog::new(
        vec![topic.liveness()],
        stats,
        notifier.clone(),
        settings(180),
        shutdown.signal(),
    );

    watchdog.check().await;
    let alerts = notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].0, "Poll timer dead: transactions");
}

#[tokio::test]
async fn stale_storage_writes_are_reported() {
    let stats = Arc::new(StatsAccumulator::new());
    stats.increment(1, 1);

    let (notifier, _) = RecordingNotifier::new();
    let shutdown = Shutdown::new();
    let watchdog = Watchdog::new(
        Vec::new(),
        stats,
        notifier.clone(),
        settings(0),
        shutdown.signal(),
    );

    // Any elapsed time beats a zero threshold.
    tokio::time::sleep(Duration::from_millis(5)).await;
    watchdog.check().await;

    let alerts = notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].0, "Storage writes stalled");
}

#[tokio::test]
async fn silence_before_any_write_counts_from_process_start() {
    let stats = Arc::new(StatsAccumulator::new());

    let (notifier, _) = RecordingNotifier::new();
    let shutdown = Shutdown::new();
    let watchdog = Watchdog::new(
        Vec::new(),
        stats,
        notifier.clone(),
        settings(0),
        shutdown.signal(),
    );

    tokio::time::sleep(Duration::from_millis(5)).await;
    watchdog.check().await;
    assert_eq!(notifier.alerts().len(), 1);
}
