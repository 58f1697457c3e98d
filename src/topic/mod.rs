//! Event distribution between feeds and the reconciliation layer.
//!
//! A [`Topic`] fans one message stream out to its subscribers in
//! registration order. The two delivery variants wrap it:
//! - [`push::PushTopic`] — decodes externally delivered payloads
//! - [`poll::PollTopic`] — owns a self-rescheduling fetch/retry loop
//!
//! Exactly one dispatcher exists per stream process-wide, collected in
//! the [`Topics`] registry built once at startup and shared by every
//! producer and consumer.

pub mod poll;
pub mod push;

use std::sync::{Arc, RwLock};

use futures_util::future::BoxFuture;
use tracing::debug;

use crate::config::AppConfig;
use crate::models::book::OrderBookSnapshot;
use crate::models::ticker::TickerSnapshot;
use crate::models::trade::TradeEvent;
use crate::models::transaction::TransactionRecord;
use crate::notifier::Notifier;
use crate::shutdown::Shutdown;
use crate::source::HttpSource;

use poll::PollTopic;
use push::PushTopic;

/// A registered observer: an async callback invoked once per published
/// message. Returning an error aborts the rest of that publish.
pub type Subscriber<T> = Box<dyn Fn(Arc<T>) -> BoxFuture<'static, crate::Result<()>> + Send + Sync>;

/// An addressable event stream with synchronous in-order fan-out.
pub struct Topic<T> {
    name: &'static str,
    subscribers: RwLock<Vec<Arc<Subscriber<T>>>>,
}

impl<T> Topic<T> {
    pub fn new(name: &'static str) -> Self {
        Topic {
            name,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registers an observer. Subscribers are never removed; they live
    /// until process exit.
    pub fn subscribe(&self, subscriber: Subscriber<T>) {
        self.subscribers
            .write()
            .expect("subscriber list poisoned")
            .push(Arc::new(subscriber));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .expect("subscriber list poisoned")
            .len()
    }

    /// Delivers `message` to every subscriber in registration order,
    /// awaiting each in the calling task.
    ///
    /// # Errors
    ///
    /// The first subscriber error aborts the remaining dispatch and is
    /// returned to the publisher — no partial retry, no reordering.
    pub async fn publish(&self, message: T) -> crate::Result<()> {
        let message = Arc::new(message);
        let subscribers: Vec<Arc<Subscriber<T>>> = self
            .subscribers
            .read()
            .expect("subscriber list poisoned")
            .iter()
            .cloned()
            .collect();

        debug!(topic = self.name, subscribers = subscribers.len(), "Publishing");
        for subscriber in &subscribers {
            subscriber(Arc::clone(&message)).await?;
        }

        Ok(())
    }
}

/// The process-wide topic registry: one dispatcher per stream.
pub struct Topics {
    pub order_book: Arc<PushTopic<OrderBookSnapshot>>,
    pub trades: Arc<PushTopic<TradeEvent>>,
    pub ticker: Arc<PollTopic<TickerSnapshot>>,
    pub transactions: Arc<PollTopic<Vec<TransactionRecord>>>,
}

impl Topics {
    /// Builds the registry against the configured HTTP poll sources.
    pub fn from_config(config: &AppConfig, notifier: Arc<dyn Notifier>, shutdown: &Shutdown) -> Self {
        let client = reqwest::Client::new();

        Topics {
            order_book: Arc::new(PushTopic::new("order_book")),
            trades: Arc::new(PushTopic::new("live_trades")),
            ticker: PollTopic::new(
                "ticker",
                Arc::new(HttpSource::new(client.clone(), config.ticker.url.clone())),
                crate::models::ticker::decode,
                config.ticker.clone(),
                Arc::clone(&notifier),
                shutdown.signal(),
            ),
            transactions: PollTopic::new(
                "transactions",
                Arc::new(HttpSource::new(client, config.transactions.url.clone())),
                crate::models::transaction::decode_list,
                config.transactions.clone(),
                notifier,
                shutdown.signal(),
            ),
        }
    }
}
