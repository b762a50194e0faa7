//! Mode guard — a compare-and-set lock held while a mode change is in flight.
//!
//! While the guard is held, poll cycles are skipped and the auto-feed
//! evaluator stays silent, so the optimistic local mode and the server's
//! answer cannot race each other. The controller keeps a second guard for
//! manual feed requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Shared switching flag. Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct ModeGuard {
    held: Arc<AtomicBool>,
}

impl ModeGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a mode change currently holds the guard.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Take the guard if nobody holds it.
    ///
    /// Returns `None` when another switch is already in flight.
    #[must_use]
    pub fn try_acquire(&self) -> Option<SwitchToken> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SwitchToken {
                held: Some(Arc::clone(&self.held)),
            })
    }
}

/// Proof of holding the [`ModeGuard`]. Dropping it releases the guard.
#[derive(Debug)]
#[must_use = "dropping the token releases the guard immediately"]
pub struct SwitchToken {
    held: Option<Arc<AtomicBool>>,
}

impl SwitchToken {
    /// Release the guard now.
    pub fn release(self) {
        drop(self);
    }

    /// Release the guard once `delay` has elapsed.
    ///
    /// Must be called from within a tokio runtime when `delay` is non-zero.
    pub fn release_after(mut self, delay: Duration) {
        let Some(held) = self.held.take() else {
            return;
        };
        if delay.is_zero() {
            held.store(false, Ordering::Release);
            return;
        }
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            held.store(false, Ordering::Release);
            tracing::trace!("mode guard released");
        });
    }
}

impl Drop for SwitchToken {
    fn drop(&mut self) {
        if let Some(held) = self.held.take() {
            held.store(false, Ordering::Release);
        }
    }
}
