use std::sync::Arc;

use magpie::MagpieError;
use magpie::collector::Collector;
use magpie::config::fetch_config;
use magpie::feed::FeedClient;
use magpie::notifier::{HttpNotifier, LogNotifier, Notifier};
use magpie::repository::MemoryRepository;
use magpie::shutdown::Shutdown;
use magpie::stats::StatsAccumulator;
use magpie::topic::Topics;
use magpie::watchdog::Watchdog;

#[tokio::main]
async fn main() -> Result<(), MagpieError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    let config = fetch_config()?;
    let shutdown = Shutdown::new();

    let notifier: Arc<dyn Notifier> = match &config.alert_url {
        Some(url) => Arc::new(HttpNotifier::new(reqwest::Client::new(), url.clone())),
        None => Arc::new(LogNotifier),
    };

    let topics = Topics::from_config(&config, Arc::clone(&notifier), &shutdown);
    let repository = Arc::new(MemoryRepository::new());
    let stats = Arc::new(StatsAccumulator::new());

    // Subscribing starts the ticker and transactions poll cycles.
    let collector = Collector::new(repository, Arc::clone(&stats), config.book_depth);
    collector.attach(&topics);

    let watchdog = Watchdog::new(
        vec![topics.ticker.liveness(), topics.transactions.liveness()],
        stats,
        notifier,
        config.watchdog.clone(),
        shutdown.signal(),
    );
    tokio::spawn(watchdog.run());

    let feed = FeedClient::new(
        &config.feed,
        Arc::clone(&topics.order_book),
        Arc::clone(&topics.trades),
        shutdown.signal(),
    );
    tokio::spawn(feed.run());

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| MagpieError::Config(format!("cannot listen for ctrl-c: {e}")))?;
    tracing::info!("Shutting down");
    shutdown.trigger();

    Ok(())
}
