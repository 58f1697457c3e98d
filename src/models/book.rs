//! Order-book channel models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Full order-book snapshot delivered on the push feed.
///
/// Asks are sorted ascending and bids descending by price, as sent by
/// the exchange; consumers retain only the top levels of each side.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderBookSnapshot {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
}

impl OrderBookSnapshot {
    /// The best `depth` ask levels (lowest prices first).
    pub fn top_asks(&self, depth: usize) -> Vec<PriceLevel> {
        self.asks.iter().take(depth).cloned().collect()
    }

    /// The best `depth` bid levels (highest prices first).
    pub fn top_bids(&self, depth: usize) -> Vec<PriceLevel> {
        self.bids.iter().take(depth).cloned().collect()
    }
}

/// A single price level, decoded from a `[price, amount]` pair.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PriceLevel(pub Decimal, pub Decimal);

impl PriceLevel {
    pub fn price(&self) -> Decimal {
        self.0
    }

    pub fn amount(&self) -> Decimal {
        self.1
    }
}
