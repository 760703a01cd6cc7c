//! Deferred state transitions.
//!
//! The error banner and the copy check mark both reset themselves after a
//! fixed window. Each of those resets lives in an [`AutoClear`] slot: a
//! single spawned tokio task that sleeps and then fires a closure.
//! Scheduling again aborts whatever was pending, so an old timer never
//! clears a newer value. The controller additionally tags every value with
//! an epoch and the closure re-checks it, which covers the window where a
//! timer has already woken but not yet run.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// One cancellable pending callback.
#[derive(Debug, Default)]
pub struct AutoClear {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl AutoClear {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fire` after `after`, replacing (and aborting) any pending callback.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, after: Duration, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            fire();
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            trace!("superseding pending auto-clear");
            previous.abort();
        }
    }

    /// Abort the pending callback, if any.
    pub fn cancel(&self) {
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Whether a callback is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for AutoClear {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn fires_after_window() {
        let fired = Arc::new(AtomicUsize::new(0));
        let slot = AutoClear::new();

        let f = fired.clone();
        slot.schedule(Duration::from_secs(3), move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        assert!(slot.is_pending());

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!slot.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_aborts_previous() {
        let fired = Arc::new(AtomicUsize::new(0));
        let slot = AutoClear::new();

        let f = fired.clone();
        slot.schedule(Duration::from_secs(3), move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_secs(2)).await;

        let f = fired.clone();
        slot.schedule(Duration::from_secs(3), move || {
            f.fetch_add(10, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0, "first timer must not fire");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let fired = Arc::new(AtomicUsize::new(0));
        let slot = AutoClear::new();

        let f = fired.clone();
        slot.schedule(Duration::from_secs(1), move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        slot.cancel();
        assert!(!slot.is_pending());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
