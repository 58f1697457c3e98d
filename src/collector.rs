//! The reconciliation layer: subscribes to all four topics and turns
//! their streams into persisted, progressively enriched trade records.
//!
//! Flow: a trade event is inserted together with the top book levels
//! current at that moment, then its id waits in the pending set until
//! the next ticker cycle applies the daily aggregates; the transactions
//! cycle independently fills in the trade direction.

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::models::book::OrderBookSnapshot;
use crate::models::ticker::TickerSnapshot;
use crate::models::trade::TradeEvent;
use crate::models::transaction::TransactionRecord;
use crate::reconcile::PendingIds;
use crate::repository::Repository;
use crate::stats::StatsAccumulator;
use crate::topic::Topics;

/// Owns the collector-side state shared by the four callbacks.
pub struct Collector<R> {
    repository: Arc<R>,
    stats: Arc<StatsAccumulator>,
    pending: PendingIds,
    latest_book: RwLock<Option<Arc<OrderBookSnapshot>>>,
    book_depth: usize,
}

impl<R: Repository + 'static> Collector<R> {
    pub fn new(repository: Arc<R>, stats: Arc<StatsAccumulator>, book_depth: usize) -> Arc<Self> {
        Arc::new(Collector {
            repository,
            stats,
            pending: PendingIds::new(),
            latest_book: RwLock::new(None),
            book_depth,
        })
    }

    /// Trade ids currently awaiting a ticker reconciliation.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Subscribes the four reconciliation callbacks to the registry.
    /// Subscribing the two poll topics starts their fetch cycles.
    pub fn attach(self: &Arc<Self>, topics: &Topics) {
        let collector = Arc::clone(self);
        topics.order_book.subscribe(Box::new(move |book| {
            let collector = Arc::clone(&collector);
            Box::pin(async move { collector.on_order_book(book) })
        }));

        let collector = Arc::clone(self);
        topics.trades.subscribe(Box::new(move |trade| {
            let collector = Arc::clone(&collector);
            Box::pin(async move { collector.on_trade(trade).await })
        }));

        let collector = Arc::clone(self);
        topics.ticker.subscribe(Box::new(move |snapshot| {
            let collector = Arc::clone(&collector);
            Box::pin(async move { collector.on_ticker(snapshot).await })
        }));

        let collector = Arc::clone(self);
        topics.transactions.subscribe(Box::new(move |transactions| {
            let collector = Arc::clone(&collector);
            Box::pin(async move { collector.on_transactions(transactions).await })
        }));
    }

    fn on_order_book(&self, book: Arc<OrderBookSnapshot>) -> crate::Result<()> {
        debug!(asks = book.asks.len(), bids = book.bids.len(), "Book refreshed");
        *self.latest_book.write().expect("book cache poisoned") = Some(book);
        Ok(())
    }

    async fn on_trade(&self, trade: Arc<TradeEvent>) -> crate::Result<()> {
        info!(id = trade.id, amount = %trade.amount, price = %trade.price, "New trade");

        // A trade may beat the first book snapshot; it is stored with
        // empty levels rather than dropped.
        let (asks, bids) = match &*self.latest_book.read().expect("book cache poisoned") {
            Some(book) => (book.top_asks(self.book_depth), book.top_bids(self.book_depth)),
            None => (Vec::new(), Vec::new()),
        };

        self.repository
            .insert_trade(trade.id, trade.price, trade.amount, asks, bids)
            .await?;

        // Only a confirmed insert joins a reconciliation batch.
        self.pending.append(trade.id);
        self.stats.increment(1, 1);
        Ok(())
    }

    async fn on_ticker(&self, snapshot: Arc<TickerSnapshot>) -> crate::Result<()> {
        debug!(
            high = %snapshot.daily_high,
            low = %snapshot.daily_low,
            "New ticker"
        );

        let ids = self.pending.drain_and_clear();
        if ids.is_empty() {
            return Ok(());
        }

        self.repository.apply_ticker_snapshot(&snapshot, &ids).await?;
        self.stats.increment(0, -(ids.len() as i64));
        info!(trades = ids.len(), "Reconciled batch against ticker");
        Ok(())
    }

    async fn on_transactions(&self, transactions: Arc<Vec<TransactionRecord>>) -> crate::Result<()> {
        debug!(count = transactions.len(), "New transactions");
        self.repository.reconcile_sell_flag(&transactions).await
    }
}
