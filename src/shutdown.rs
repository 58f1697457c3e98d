//! Cooperative shutdown signal shared by every long-running task.
//!
//! [`Shutdown`] is held by the process owner (or a test); each poll
//! loop, the feed client, and the watchdog carry a [`ShutdownSignal`]
//! and exit at the next opportunity after [`Shutdown::trigger`].

use tokio::sync::watch;

/// Owning side of the shutdown signal.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Shutdown { tx }
    }

    /// A listener handle to hand to a task.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Tells every listening task to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Listening side of the shutdown signal.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Completes once shutdown has been triggered.
    ///
    /// A dropped [`Shutdown`] counts as triggered, so orphaned tasks
    /// cannot linger.
    pub async fn triggered(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }
}
