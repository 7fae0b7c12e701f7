//! Graceful shutdown fan-out.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::signals;

/// One trigger, many listeners: each server holds a receiver and starts
/// draining when it fires.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver that resolves once shutdown begins.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Begin shutdown. Calling it again is harmless.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no listeners");
        }
    }

    /// Trigger on SIGINT or SIGTERM, from a background task.
    pub fn trigger_on_signal(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            signals::wait_for_termination().await;
            tracing::info!("Starting graceful shutdown");
            self.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
