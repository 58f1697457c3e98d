//! Trade channel models and the persisted trade record.

use std::time::SystemTime;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::TradeSide;
use super::book::PriceLevel;

/// A single executed trade delivered on the push feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeEvent {
    pub id: u64,
    pub amount: Decimal,
    pub price: Decimal,
}

/// A persisted trade, inserted once and enriched asynchronously.
///
/// `side`/`executed_at` arrive with the next transactions cycle and the
/// `daily` aggregates with the next ticker cycle; each is written at
/// most once.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub id: u64,
    /// When the insert happened, not when the trade executed.
    pub inserted_at: SystemTime,
    pub price: Decimal,
    pub amount: Decimal,
    /// Top ask levels captured from the book snapshot current at insert time.
    pub asks: Vec<PriceLevel>,
    /// Top bid levels captured from the book snapshot current at insert time.
    pub bids: Vec<PriceLevel>,
    pub side: Option<TradeSide>,
    /// Execution timestamp (epoch seconds) from the transactions feed.
    pub executed_at: Option<i64>,
    pub daily: Option<DailyStats>,
}

/// Daily aggregate fields applied from a ticker snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub high: Decimal,
    pub low: Decimal,
    pub vwap: Decimal,
    pub volume: Decimal,
}
