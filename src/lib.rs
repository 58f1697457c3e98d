//! Market-data collection and reconciliation service library.
//!
//! Ingests push-delivered events (order-book snapshots, trades) and
//! pull-polled snapshots (ticker statistics, recent transactions) and
//! reconciles them into persisted trade records whose fields arrive
//! asynchronously and out of order.

pub mod collector;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod notifier;
pub mod reconcile;
pub mod repository;
pub mod shutdown;
pub mod source;
pub mod stats;
pub mod topic;
pub mod watchdog;

pub use error::{MagpieError, Result};
