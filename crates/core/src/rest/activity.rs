//! In-flight call counter
//!
//! Every HTTP attempt holds an [`ActivityGuard`] for as long as its outcome
//! is pending. The count doubles as the reauthentication loop guard, and
//! changes are observable through [`ActivityCounter::subscribe`] (e.g. to
//! drive a network-activity spinner).
//!
//! The count lives inside a `tokio::sync::watch` channel. `send_modify`
//! serialises writers on the channel's short-held lock and wakes receivers
//! only after that lock is released, so listeners never run under it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

/// Shared counter of in-flight HTTP attempts
#[derive(Debug, Clone)]
pub struct ActivityCounter {
    tx: Arc<watch::Sender<usize>>,
}

impl Default for ActivityCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityCounter {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Count one attempt as started; the returned guard ends it on drop
    pub fn enter(&self) -> ActivityGuard {
        let count = self.apply(|count| count.saturating_add(1));
        trace!(active = count, "Call started");
        ActivityGuard { counter: self.clone() }
    }

    pub fn current(&self) -> usize {
        *self.tx.borrow()
    }

    /// Receiver that observes every change to the count
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }

    fn exit(&self) {
        let count = self.apply(|count| count.saturating_sub(1));
        trace!(active = count, "Call finished");
    }

    fn apply(&self, update: impl FnOnce(usize) -> usize) -> usize {
        let mut after = 0;
        self.tx.send_modify(|count| {
            *count = update(*count);
            after = *count;
        });
        after
    }
}

/// Marks one in-flight attempt; decrements the counter exactly once on drop
#[derive(Debug)]
#[must_use = "dropping the guard immediately ends the attempt"]
pub struct ActivityGuard {
    counter: ActivityCounter,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.counter.exit();
    }
}
