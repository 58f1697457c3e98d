//! In-memory repository backing the binary and the integration tests.

use std::collections::HashMap;
use std::time::SystemTime;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::Repository;
use crate::error::MagpieError;
use crate::models::book::PriceLevel;
use crate::models::ticker::TickerSnapshot;
use crate::models::trade::{DailyStats, TradeRecord};
use crate::models::transaction::TransactionRecord;

/// Keeps every trade record in a map, enforcing the same insert-once
/// and set-once rules a real store would.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    trades: RwLock<HashMap<u64, TradeRecord>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn trade_count(&self) -> usize {
        self.trades.read().await.len()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn insert_trade(
        &self,
        id: u64,
        price: Decimal,
        amount: Decimal,
        asks: Vec<PriceLevel>,
        bids: Vec<PriceLevel>,
    ) -> crate::Result<()> {
        let mut trades = self.trades.write().await;
        if trades.contains_key(&id) {
            return Err(MagpieError::Persistence(format!(
                "trade {id} already inserted"
            )));
        }

        trades.insert(
            id,
            TradeRecord {
                id,
                inserted_at: SystemTime::now(),
                price,
                amount,
                asks,
                bids,
                side: None,
                executed_at: None,
                daily: None,
            },
        );
        Ok(())
    }

    async fn apply_ticker_snapshot(
        &self,
        snapshot: &TickerSnapshot,
        ids: &[u64],
    ) -> crate::Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut trades = self.trades.write().await;
        for id in ids {
            let record = trades.get_mut(id).ok_or_else(|| {
                MagpieError::Persistence(format!("trade {id} missing from storage"))
            })?;

            if record.daily.is_none() {
                record.daily = Some(DailyStats {
                    high: snapshot.daily_high,
                    low: snapshot.daily_low,
                    vwap: snapshot.daily_vwap,
                    volume: snapshot.daily_volume,
                });
            }
        }
        Ok(())
    }

    async fn reconcile_sell_flag(&self, transactions: &[TransactionRecord]) -> crate::Result<()> {
        let mut trades = self.trades.write().await;
        for tx in transactions {
            // Ids the collector never saw (other venues, pre-start
            // history) are not ours to record.
            if let Some(record) = trades.get_mut(&tx.tid)
                && record.side.is_none()
            {
                record.side = Some(tx.side);
                record.executed_at = Some(tx.executed_at);
            }
        }
        Ok(())
    }

    async fn read_trade(&self, id: u64) -> Option<TradeRecord> {
        self.trades.read().await.get(&id).cloned()
    }
}
