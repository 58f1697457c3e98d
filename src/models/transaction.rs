//! Transactions poll-response models.

use serde::{Deserialize, Deserializer, de};

use super::TradeSide;

/// One entry of the polled recent-transactions list.
///
/// Wire shape: `{ "tid": int, "type": 0|1, "date": "<epoch seconds>" }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionRecord {
    pub tid: u64,
    #[serde(rename = "type", deserialize_with = "side_from_code")]
    pub side: TradeSide,
    #[serde(rename = "date", deserialize_with = "epoch_seconds")]
    pub executed_at: i64,
}

/// Decodes a transactions poll body, newest entry first as delivered.
///
/// # Errors
///
/// Returns [`MagpieError::Decode`](crate::MagpieError::Decode) for
/// malformed JSON or out-of-range field values.
pub fn decode_list(raw: &str) -> crate::Result<Vec<TransactionRecord>> {
    Ok(serde_json::from_str(raw)?)
}

fn side_from_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TradeSide, D::Error> {
    let code = u8::deserialize(deserializer)?;
    TradeSide::from_code(code)
        .ok_or_else(|| de::Error::custom(format!("transaction type {code} is not 0 or 1")))
}

/// The feed nominally sends the date as a string of epoch seconds, but
/// accept a bare integer as well.
fn epoch_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(secs) => Ok(secs),
        Raw::Text(text) => text
            .parse()
            .map_err(|_| de::Error::custom(format!("date {text:?} is not epoch seconds"))),
    }
}
