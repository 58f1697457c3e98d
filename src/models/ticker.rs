//! Ticker poll-response models.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::MagpieError;

/// Raw ticker response body; every numeric field arrives string-encoded.
#[derive(Debug, Deserialize)]
pub struct TickerResponse {
    pub high: Decimal,
    pub low: Decimal,
    pub vwap: Decimal,
    pub volume: Decimal,
    pub timestamp: String,
}

/// Daily statistics snapshot published to ticker subscribers.
///
/// Rebuilt from scratch on every successful poll and published by value,
/// so a subscriber always observes one consistent cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerSnapshot {
    pub daily_high: Decimal,
    pub daily_low: Decimal,
    pub daily_vwap: Decimal,
    pub daily_volume: Decimal,
    /// Server-side epoch seconds of the snapshot.
    pub last_check_timestamp: i64,
}

impl TryFrom<TickerResponse> for TickerSnapshot {
    type Error = MagpieError;

    fn try_from(wire: TickerResponse) -> crate::Result<Self> {
        let last_check_timestamp = wire.timestamp.parse().map_err(|_| {
            MagpieError::Malformed(format!("ticker timestamp {:?} is not epoch seconds", wire.timestamp))
        })?;

        Ok(TickerSnapshot {
            daily_high: wire.high,
            daily_low: wire.low,
            daily_vwap: wire.vwap,
            daily_volume: wire.volume,
            last_check_timestamp,
        })
    }
}

/// Decodes a ticker poll body into a snapshot.
///
/// # Errors
///
/// Returns [`MagpieError::Decode`] for malformed JSON and
/// [`MagpieError::Malformed`] when a field fails to parse.
pub fn decode(raw: &str) -> crate::Result<TickerSnapshot> {
    let wire: TickerResponse = serde_json::from_str(raw)?;
    TickerSnapshot::try_from(wire)
}
