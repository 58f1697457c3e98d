//! Persistence port consumed by the reconciliation layer.

pub mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::book::PriceLevel;
use crate::models::ticker::TickerSnapshot;
use crate::models::trade::TradeRecord;
use crate::models::transaction::TransactionRecord;

pub use memory::MemoryRepository;

/// Abstract storage for trade records.
///
/// Implementations own their durability and internal concurrency
/// control; the collector only relies on the contracts below.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Persists a new trade with the book levels current at insert time.
    ///
    /// # Errors
    ///
    /// Fails if the id was already inserted or the write cannot be
    /// completed; on failure the caller must not treat the trade as
    /// pending reconciliation.
    async fn insert_trade(
        &self,
        id: u64,
        price: Decimal,
        amount: Decimal,
        asks: Vec<PriceLevel>,
        bids: Vec<PriceLevel>,
    ) -> crate::Result<()>;

    /// Applies a ticker snapshot's daily aggregates to every id in the
    /// batch. An empty batch is a no-op, not an error, and one id
    /// behaves exactly like many.
    async fn apply_ticker_snapshot(
        &self,
        snapshot: &TickerSnapshot,
        ids: &[u64],
    ) -> crate::Result<()>;

    /// Sets side and execution timestamp for every transaction whose id
    /// exists in storage, at most once per id. Ids not present are
    /// silently skipped.
    async fn reconcile_sell_flag(&self, transactions: &[TransactionRecord]) -> crate::Result<()>;

    /// Reads back a stored trade.
    async fn read_trade(&self, id: u64) -> Option<TradeRecord>;
}
