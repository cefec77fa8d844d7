//! Shutdown coordination for the HTTP host.

use tokio::sync::broadcast;

use crate::lifecycle::signals::shutdown_signal;

/// Broadcasts a single shutdown event to every subscribed task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify subscribers. Triggering with no subscribers is not an error.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Trigger once the process receives a termination signal.
    pub fn trigger_on_signal(&self) -> tokio::task::JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
