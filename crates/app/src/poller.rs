//! Poller — drives [`Controller::poll_once`] on a fixed interval.
//!
//! Each tick runs its cycle as a separate task, so a hung request never
//! delays the next tick. Overlapping cycles are tolerated: the last one to
//! finish wins.

use std::future::Future;
use std::sync::Arc;

use tokio::time::{Instant, MissedTickBehavior};

use crate::controller::Controller;
use crate::ports::{Clock, FeederBackend, FeederView};

/// Periodic poll loop around a shared [`Controller`].
pub struct Poller<B, V, C> {
    controller: Arc<Controller<B, V, C>>,
}

impl<B, V, C> Poller<B, V, C>
where
    B: FeederBackend + Send + Sync + 'static,
    V: FeederView,
    C: Clock + 'static,
{
    pub fn new(controller: Arc<Controller<B, V, C>>) -> Self {
        Self { controller }
    }

    /// Tick every `poll_interval` until `shutdown` resolves.
    ///
    /// The first cycle fires one interval after the call; the caller is
    /// expected to have run the initial poll itself.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send) {
        let period = self.controller.policy().poll_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(interval_ms = period.as_millis(), "poller started");
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    let controller = Arc::clone(&self.controller);
                    tokio::spawn(async move {
                        if let Err(err) = controller.poll_once().await {
                            tracing::debug!(error = %err, "poll cycle failed");
                        }
                    });
                }
            }
        }
        tracing::info!("poller stopped");
    }

    /// Run the loop as a background task.
    pub fn spawn(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
