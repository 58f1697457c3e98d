//! Shared state correlating trade inserts with ticker cycles.

use std::sync::Mutex;

/// Trade ids inserted since the last successful ticker reconciliation.
///
/// Many trade callbacks append; the single ticker callback drains. The
/// mutex linearizes the two, and because the drain takes and resets the
/// set in one critical section, every id lands in exactly one batch:
/// the first drain strictly after its append.
#[derive(Debug, Default)]
pub struct PendingIds {
    ids: Mutex<Vec<u64>>,
}

impl PendingIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an id. Call only after the insert has been confirmed.
    pub fn append(&self, id: u64) {
        self.ids.lock().expect("pending set poisoned").push(id);
    }

    /// Atomically takes the current batch and leaves the set empty.
    pub fn drain_and_clear(&self) -> Vec<u64> {
        std::mem::take(&mut *self.ids.lock().expect("pending set poisoned"))
    }

    pub fn len(&self) -> usize {
        self.ids.lock().expect("pending set poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
