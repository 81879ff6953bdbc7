//! # In-flight dispatch accounting.
//!
//! Counts dispatches that were scheduled but have not finished yet, and lets
//! callers wait until the count reaches zero.
//!
//! ```text
//! broadcast() ── enter() ──► count += 1 ──► spawn(task holding guard)
//!                                                   │
//!                              guard dropped ◄──────┘ (finish, panic or abort)
//!                              count -= 1 ──► wake wait_idle()
//! ```
//!
//! The counter lives in a [`tokio::sync::watch`] channel so waiters observe
//! every transition without polling.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared counter of running dispatches.
#[derive(Debug)]
pub(crate) struct Inflight {
    tx: Arc<watch::Sender<usize>>,
}

impl Inflight {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(0usize);
        Self { tx: Arc::new(tx) }
    }

    /// Registers one more running dispatch; the returned guard undoes it on drop.
    pub(crate) fn enter(&self) -> InflightGuard {
        self.tx.send_modify(|n| *n += 1);
        InflightGuard {
            tx: Arc::clone(&self.tx),
        }
    }

    /// Current number of running dispatches.
    pub(crate) fn count(&self) -> usize {
        *self.tx.borrow()
    }

    /// Resolves once no dispatch is running.
    pub(crate) async fn wait_idle(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

/// Decrements the in-flight counter when dropped.
#[derive(Debug)]
pub(crate) struct InflightGuard {
    tx: Arc<watch::Sender<usize>>,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.tx.send_modify(|n| *n = n.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_guard_restores_count() {
        let inflight = Inflight::new();
        let a = inflight.enter();
        let b = inflight.enter();
        assert_eq!(inflight.count(), 2);

        drop(a);
        assert_eq!(inflight.count(), 1);
        drop(b);
        assert_eq!(inflight.count(), 0);
    }

    #[tokio::test]
    async fn test_wait_idle_returns_immediately_when_empty() {
        let inflight = Inflight::new();
        tokio::time::timeout(Duration::from_secs(1), inflight.wait_idle())
            .await
            .expect("idle counter should not block");
    }

    #[tokio::test]
    async fn test_wait_idle_wakes_on_last_guard() {
        let inflight = Arc::new(Inflight::new());
        let guard = inflight.enter();

        let waiter = {
            let inflight = Arc::clone(&inflight);
            tokio::spawn(async move { inflight.wait_idle().await })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter should not panic");
    }
}
