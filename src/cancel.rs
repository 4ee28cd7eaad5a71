//! Liveness handles for pending asynchronous results.
//!
//! Work started on behalf of an owner (a screen, a store) keeps running when
//! the owner goes away. A [`Liveness`] handle lets the owner mark the pending
//! result as unwanted so it is discarded on arrival instead of being applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Cloneable cancellation flag shared between an owner and its pending work.
#[derive(Clone, Default)]
pub struct Liveness {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pending work as discarded. Idempotent.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        // Register interest before checking the flag so a cancel racing
        // with this call is not lost.
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

impl std::fmt::Debug for Liveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Liveness")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn cancel_is_idempotent() {
        let live = Liveness::new();
        assert!(!live.is_cancelled());
        live.cancel();
        live.cancel();
        assert!(live.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_resolves_after_cancel() {
        let live = Liveness::new();
        let waiter = live.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        live.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_returns_immediately_when_already_cancelled() {
        let live = Liveness::new();
        live.cancel();
        tokio::time::timeout(Duration::from_millis(100), live.cancelled())
            .await
            .expect("should not block");
    }
}
