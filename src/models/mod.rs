//! Wire and domain models for the collected market-data streams.
//!
//! Each feed gets its own module: push payloads in [`book`] and
//! [`trade`], poll responses in [`ticker`] and [`transaction`]. Shared
//! vocabulary lives here.

pub mod book;
pub mod ticker;
pub mod trade;
pub mod transaction;

use serde::{Deserialize, Serialize};

/// Direction of an executed trade.
///
/// The transactions feed encodes this as an integer (`0` = buy,
/// `1` = sell); it is unknown for a freshly inserted trade until the
/// next transactions cycle reconciles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Maps the feed's integer encoding to a side.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TradeSide::Buy),
            1 => Some(TradeSide::Sell),
            _ => None,
        }
    }
}
