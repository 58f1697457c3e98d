//! Running counters over inserted and still-incomplete rows.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Accumulates insert/reconciliation counters.
///
/// `null_rows` tracks rows still missing their daily aggregates: +1 on
/// every insert, -batch on every ticker reconciliation.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    inserted_rows: AtomicU64,
    null_rows: AtomicI64,
    last_write: Mutex<Option<Instant>>,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub inserted_rows: u64,
    pub null_rows: i64,
    pub last_write: Instant,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a storage write: `inserted` new rows and a signed change
    /// to the incomplete-row count.
    pub fn increment(&self, inserted: u64, nulls: i64) {
        self.inserted_rows.fetch_add(inserted, Ordering::SeqCst);
        self.null_rows.fetch_add(nulls, Ordering::SeqCst);
        *self.last_write.lock().expect("stats clock poisoned") = Some(Instant::now());
    }

    /// The latest snapshot, or `None` before the first write.
    pub fn snapshot(&self) -> Option<StatsSnapshot> {
        let last_write = (*self.last_write.lock().expect("stats clock poisoned"))?;
        Some(StatsSnapshot {
            inserted_rows: self.inserted_rows.load(Ordering::SeqCst),
            null_rows: self.null_rows.load(Ordering::SeqCst),
            last_write,
        })
    }

    /// Time since the last write, or `None` before the first.
    pub fn since_last_write(&self) -> Option<Duration> {
        self.last_write
            .lock()
            .expect("stats clock poisoned")
            .map(|at| at.elapsed())
    }
}
