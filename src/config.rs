//! Application configuration loaded from environment variables.
//!
//! Everything has a sensible default, so an empty environment yields a
//! working configuration against the public endpoints:
//! - `MAGPIE_FEED_URL` — WebSocket endpoint delivering the push channels
//! - `MAGPIE_TICKER_URL` / `MAGPIE_TRANSACTIONS_URL` — polled endpoints
//! - `MAGPIE_TICKER_INTERVAL_SECS` / `MAGPIE_TRANSACTIONS_INTERVAL_SECS`
//! - `MAGPIE_FAILURE_RETRY_SECS` — shortened interval after a failed fetch
//! - `MAGPIE_MAX_POLL_FAILURES` — optional cap on consecutive fetch
//!   failures (unset: retry forever)
//! - `MAGPIE_BOOK_DEPTH` — order-book levels captured per trade
//! - `MAGPIE_ALERT_URL` — optional alert webhook
//! - `MAGPIE_WATCHDOG_INTERVAL_SECS` / `MAGPIE_STALE_WRITE_SECS`

use std::time::Duration;

use crate::error::MagpieError;

/// Default public WebSocket endpoint for the push channels.
const DEFAULT_FEED_URL: &str = "wss://ws.bitstamp.net";

/// Default polled endpoints.
const DEFAULT_TICKER_URL: &str = "https://www.bitstamp.net/api/ticker/";
const DEFAULT_TRANSACTIONS_URL: &str = "https://www.bitstamp.net/api/transactions/?time=hour";

const DEFAULT_TICKER_INTERVAL_SECS: u64 = 20;
const DEFAULT_TRANSACTIONS_INTERVAL_SECS: u64 = 60;
const DEFAULT_FAILURE_RETRY_SECS: u64 = 2;
const DEFAULT_BOOK_DEPTH: usize = 10;
const DEFAULT_WATCHDOG_INTERVAL_SECS: u64 = 60;
const DEFAULT_STALE_WRITE_SECS: u64 = 180;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub ticker: PollSettings,
    pub transactions: PollSettings,
    /// Number of top ask/bid levels captured onto each inserted trade.
    pub book_depth: usize,
    /// Alert webhook; when absent alerts go to the log only.
    pub alert_url: Option<String>,
    pub watchdog: WatchdogSettings,
}

/// Push-feed connection values.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
}

/// Timing and source values for one poll topic.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub url: String,
    /// Normal interval between successful fetches.
    pub update_interval: Duration,
    /// Shortened interval used after a connection-level failure.
    pub failure_retry: Duration,
    /// Consecutive connection failures tolerated before the topic gives
    /// up and alerts. `None` retries forever.
    pub max_consecutive_failures: Option<u32>,
}

/// Watchdog cadence and staleness threshold.
#[derive(Debug, Clone)]
pub struct WatchdogSettings {
    pub check_interval: Duration,
    /// How long storage may go without a write before an alert fires.
    pub stale_after: Duration,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`MagpieError::Config`] if a numeric variable is set but does
/// not parse.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let failure_retry = Duration::from_secs(u64_var(
        "MAGPIE_FAILURE_RETRY_SECS",
        DEFAULT_FAILURE_RETRY_SECS,
    )?);
    let max_consecutive_failures = opt_u32_var("MAGPIE_MAX_POLL_FAILURES")?;

    Ok(AppConfig {
        feed: FeedConfig {
            url: non_empty_var("MAGPIE_FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
        },
        ticker: PollSettings {
            url: non_empty_var("MAGPIE_TICKER_URL")
                .unwrap_or_else(|| DEFAULT_TICKER_URL.to_string()),
            update_interval: Duration::from_secs(u64_var(
                "MAGPIE_TICKER_INTERVAL_SECS",
                DEFAULT_TICKER_INTERVAL_SECS,
            )?),
            failure_retry,
            max_consecutive_failures,
        },
        transactions: PollSettings {
            url: non_empty_var("MAGPIE_TRANSACTIONS_URL")
                .unwrap_or_else(|| DEFAULT_TRANSACTIONS_URL.to_string()),
            update_interval: Duration::from_secs(u64_var(
                "MAGPIE_TRANSACTIONS_INTERVAL_SECS",
                DEFAULT_TRANSACTIONS_INTERVAL_SECS,
            )?),
            failure_retry,
            max_consecutive_failures,
        },
        book_depth: u64_var("MAGPIE_BOOK_DEPTH", DEFAULT_BOOK_DEPTH as u64)? as usize,
        alert_url: non_empty_var("MAGPIE_ALERT_URL"),
        watchdog: WatchdogSettings {
            check_interval: Duration::from_secs(u64_var(
                "MAGPIE_WATCHDOG_INTERVAL_SECS",
                DEFAULT_WATCHDOG_INTERVAL_SECS,
            )?),
            stale_after: Duration::from_secs(u64_var(
                "MAGPIE_STALE_WRITE_SECS",
                DEFAULT_STALE_WRITE_SECS,
            )?),
        },
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Parses a numeric environment variable, falling back to `default`.
fn u64_var(name: &str, default: u64) -> crate::Result<u64> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| MagpieError::Config(format!("{name} must be an integer, got {raw:?}"))),
        None => Ok(default),
    }
}

/// Parses an optional numeric environment variable.
fn opt_u32_var(name: &str) -> crate::Result<Option<u32>> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| MagpieError::Config(format!("{name} must be an integer, got {raw:?}"))),
        None => Ok(None),
    }
}
