//! Cancellable delayed delivery of the latest value.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delivers a value only after `delay` passes without another `schedule`.
///
/// Each `schedule` aborts the pending timer task and discards any settled
/// value nobody has taken yet, so only the latest value is ever delivered. Dropping the debouncer aborts it too.
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    rx: mpsc::UnboundedReceiver<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            tx,
            rx,
            pending: None,
        }
    }

    /// Replace any pending value with `value` and restart the timer.
    pub fn schedule(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver lives as long as `self`.
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending value, and any settled value not yet taken.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        while self.rx.try_recv().is_ok() {}
    }

    /// Whether a timer is still running.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the next settled value.
    pub async fn settled(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// A settled value, if one is ready now.
    pub fn try_settled(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
