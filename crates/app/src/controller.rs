//! Feeder controller — reconciles backend state and runs feeding use-cases.
//!
//! The controller owns the single [`ControllerState`] and funnels every
//! mutation through it:
//!
//! - [`poll_once`](Controller::poll_once) applies a backend snapshot, then runs
//!   the auto-feed evaluator on the fully reconciled state;
//! - [`switch_mode`](Controller::switch_mode) drives the mode state machine
//!   under the [`ModeGuard`];
//! - [`feed_manual`](Controller::feed_manual), [`save_settings`](Controller::save_settings),
//!   [`add_schedule`](Controller::add_schedule) and
//!   [`delete_schedule`](Controller::delete_schedule) are one-shot actions.
//!
//! Every failure is recovered locally and surfaced as a notice; the
//! returned `Result`s are for callers that want to react further.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pawfeed_domain::error::{BlockedError, FeederError, SetupError};
use pawfeed_domain::feeding::{AutoFeedInput, FeedPolicy};
use pawfeed_domain::mode::FeedMode;
use pawfeed_domain::readout::SensorReadout;
use pawfeed_domain::schedule::{NewSchedule, ScheduleId, validate_amount};
use pawfeed_domain::settings::Settings;
use pawfeed_domain::snapshot::ScheduledFeed;
use pawfeed_domain::state::ControllerState;
use pawfeed_domain::time::backdate;

use crate::mode_guard::ModeGuard;
use crate::notices::NoticeBoard;
use crate::ports::{Ack, Clock, FeederBackend, FeederView};

/// Result of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A mode switch was in flight; nothing was fetched or applied.
    Skipped,
    /// The snapshot was applied.
    Applied {
        /// Mode adopted from the server, if it differed from the local one.
        mode_changed: Option<FeedMode>,
        auto_feed: AutoFeed,
    },
}

/// What the auto-feed evaluator did after a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFeed {
    /// Conditions not met.
    Idle,
    /// A feed request was sent and acknowledged.
    Fed,
    /// A feed request was sent and failed; the cooldown was partially rolled back.
    Failed,
}

/// Result of a mode toggle.
#[derive(Debug)]
pub enum SwitchOutcome {
    /// Another switch was in flight; nothing was sent.
    Ignored,
    /// The server applied the mode.
    Confirmed(FeedMode),
    /// The request failed and the pre-toggle mode was restored.
    Reverted { mode: FeedMode, error: FeederError },
}

/// Result of a schedule deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing was sent.
    Declined,
    /// The backend deleted the schedule and the local list was updated.
    Deleted,
}

/// The feeder mode & auto-feed controller.
pub struct Controller<B, V, C> {
    backend: B,
    view: Arc<V>,
    clock: C,
    policy: FeedPolicy,
    state: Arc<Mutex<ControllerState>>,
    settings: Mutex<Settings>,
    guard: ModeGuard,
    /// Held while a manual feed request is in flight.
    feeding: ModeGuard,
    notices: NoticeBoard<V>,
}

impl<B, V, C> Controller<B, V, C>
where
    B: FeederBackend + Send + Sync + 'static,
    V: FeederView,
    C: Clock + 'static,
{
    /// Create a builder for assembling a [`Controller`].
    #[must_use]
    pub fn builder() -> ControllerBuilder<B, V, C> {
        ControllerBuilder::default()
    }

    /// A copy of the current state.
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.lock_state().clone()
    }

    /// The settings currently in effect.
    #[must_use]
    pub fn settings(&self) -> Settings {
        *self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn policy(&self) -> &FeedPolicy {
        &self.policy
    }

    /// The guard serialising mode changes.
    #[must_use]
    pub fn mode_guard(&self) -> &ModeGuard {
        &self.guard
    }

    /// The board posting this controller's notices.
    #[must_use]
    pub fn notices(&self) -> &NoticeBoard<V> {
        &self.notices
    }

    /// Whether a mode change is in flight.
    #[must_use]
    pub fn is_switching(&self) -> bool {
        self.guard.is_held()
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Poll & reconciliation ──────────────────────────────────────

    /// Fetch a snapshot and reconcile local state with it.
    ///
    /// The whole cycle is skipped while a mode switch holds the guard,
    /// including when the switch started while the fetch was in flight.
    /// After reconciliation the auto-feed evaluator runs on the updated state.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the snapshot could not be fetched;
    /// the readout is marked as failed in that case.
    pub async fn poll_once(&self) -> Result<PollOutcome, FeederError> {
        if self.guard.is_held() {
            tracing::debug!("mode switch in flight, skipping poll cycle");
            return Ok(PollOutcome::Skipped);
        }

        let snapshot = match self.backend.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch sensor data");
                self.view.render_readout_error();
                return Err(err);
            }
        };

        let now = self.clock.now();
        let (reconciliation, mode, schedules, scheduled) = {
            let mut state = self.lock_state();
            // Switches take the guard under this lock, so the check holds
            // until the snapshot is applied.
            if self.guard.is_held() {
                tracing::debug!("mode switch started during fetch, dropping snapshot");
                return Ok(PollOutcome::Skipped);
            }
            let reconciliation = state.reconcile(&snapshot);
            let scheduled = if state.mode == FeedMode::Auto {
                snapshot.scheduled_feed()
            } else {
                None
            };
            if matches!(scheduled, Some(ScheduledFeed::Fed { .. })) {
                state.last_feed_at = now;
            }
            (
                reconciliation,
                state.mode,
                state.schedules.clone(),
                scheduled,
            )
        };

        self.view
            .render_readout(&SensorReadout::from_snapshot(&snapshot));
        if let Some(adopted) = reconciliation.mode_changed {
            tracing::info!(mode = %adopted, "adopted mode reported by server");
        }
        self.view.render_mode(mode);
        self.view.render_schedules(&schedules);

        if let Some(scheduled) = scheduled {
            self.announce_scheduled_feed(scheduled);
        }

        let auto_feed = self.evaluate_auto_feed().await;

        Ok(PollOutcome::Applied {
            mode_changed: reconciliation.mode_changed,
            auto_feed,
        })
    }

    fn announce_scheduled_feed(&self, scheduled: ScheduledFeed) {
        match scheduled {
            ScheduledFeed::Fed { message } => {
                tracing::info!(%message, "scheduled feed dispensed");
                self.notices.success(message);
            }
            ScheduledFeed::CoolingDown { message } | ScheduledFeed::Triggered { message } => {
                self.notices.info(message);
            }
            ScheduledFeed::Failed { message } => {
                tracing::warn!(%message, "scheduled feed failed");
                self.notices.error(message);
            }
        }
    }

    // ── Auto feed ──────────────────────────────────────────────────

    /// Evaluate the auto-feed rule and feed when it holds.
    ///
    /// `last_feed_at` is claimed in the same critical section as the
    /// decision, so concurrent evaluations cannot both fire. On failure it is
    /// moved to `now - failure_rollback`.
    pub async fn evaluate_auto_feed(&self) -> AutoFeed {
        let settings = self.settings();
        let now = self.clock.now();
        let claimed = {
            let mut state = self.lock_state();
            let input = AutoFeedInput::capture(
                &state,
                self.guard.is_held(),
                settings.min_food_level_kg,
                now,
            );
            let fire = self.policy.should_auto_feed(&input);
            if fire {
                state.last_feed_at = now;
            }
            fire
        };
        if !claimed {
            return AutoFeed::Idle;
        }

        let amount = settings.default_feed_amount_grams;
        tracing::info!(amount, "cat detected and food low, auto feeding");
        self.notices
            .info("cat detected and food is low, feeding automatically...");

        match self.backend.feed(amount).await {
            Ok(ack) => {
                self.notices.success(
                    ack.message
                        .unwrap_or_else(|| "automatic feeding done".to_string()),
                );
                AutoFeed::Fed
            }
            Err(err) => {
                tracing::warn!(error = %err, amount, "auto feed failed");
                let rolled_back = backdate(self.clock.now(), self.policy.failure_rollback);
                self.lock_state().last_feed_at = rolled_back;
                self.notices.error(failure_text(
                    &err,
                    "automatic feeding failed",
                    "automatic feeding failed, check the network connection",
                ));
                AutoFeed::Failed
            }
        }
    }

    // ── Mode switching ─────────────────────────────────────────────

    /// Switch the mode as the user toggled it.
    ///
    /// Ignored while another switch is in flight. Otherwise the guard is held
    /// until the request resolves plus the settle delay.
    pub async fn switch_mode(&self, requested: FeedMode) -> SwitchOutcome {
        self.switch_from_current(|_| requested).await
    }

    /// Flip the mode switch.
    pub async fn toggle_mode(&self) -> SwitchOutcome {
        self.switch_from_current(FeedMode::toggled).await
    }

    async fn switch_from_current(
        &self,
        target: impl FnOnce(FeedMode) -> FeedMode,
    ) -> SwitchOutcome {
        // The guard is taken under the state lock so no poll can apply a
        // snapshot between the acquire and the read of `previous`.
        let acquired = {
            let state = self.lock_state();
            self.guard
                .try_acquire()
                .map(|token| (token, state.mode, target(state.mode)))
        };
        let Some((token, previous, requested)) = acquired else {
            tracing::debug!("mode switch already in flight, ignoring toggle");
            return SwitchOutcome::Ignored;
        };

        self.notices
            .info(format!("switching to {}...", requested.label()));

        let outcome = match self.backend.set_mode(requested).await {
            Ok(ack) => {
                let mode = ack.current_mode;
                self.lock_state().mode = mode;
                self.view.render_mode(mode);
                tracing::info!(from = %previous, to = %mode, "mode switched");
                self.notices.success(
                    ack.message
                        .unwrap_or_else(|| format!("switched to {}", mode.label())),
                );
                SwitchOutcome::Confirmed(mode)
            }
            Err(err) => {
                self.lock_state().mode = previous;
                self.view.render_mode(previous);
                tracing::warn!(error = %err, %requested, "mode switch failed, reverting");
                self.notices.error(failure_text(
                    &err,
                    "mode switch failed, please retry",
                    "mode switch request failed, check the network connection",
                ));
                SwitchOutcome::Reverted {
                    mode: previous,
                    error: err,
                }
            }
        };

        token.release_after(self.policy.mode_settle);
        outcome
    }

    // ── Manual feed ────────────────────────────────────────────────

    /// Dispense food on the user's request.
    ///
    /// `amount_grams` falls back to the default portion when `None`. The
    /// feed control is disabled during the request and re-enabled after
    /// the policy delay if the controller is still in manual mode.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::Blocked`] outside manual mode, within the
    /// cooldown or while another manual feed is in flight,
    /// [`FeederError::Validation`] for an unusable amount, and the backend
    /// error when the request fails. No request is made in the first two
    /// cases.
    pub async fn feed_manual(&self, amount_grams: Option<f64>) -> Result<Ack, FeederError> {
        // Held until this call returns, so the cooldown check below always
        // sees the outcome of the previous feed.
        let Some(_in_flight) = self.feeding.try_acquire() else {
            tracing::debug!("manual feed already in flight");
            let blocked = BlockedError::InFlight;
            self.notices.warning(blocked.to_string());
            return Err(blocked.into());
        };

        let now = self.clock.now();
        let (mode, last_feed_at) = {
            let state = self.lock_state();
            (state.mode, state.last_feed_at)
        };

        if let Err(blocked) = self.policy.check_manual_feed(mode, last_feed_at, now) {
            match &blocked {
                BlockedError::AutoMode => {
                    self.notices.error(blocked.to_string());
                }
                BlockedError::CoolingDown { .. } | BlockedError::InFlight => {
                    self.notices.warning(blocked.to_string());
                }
            }
            return Err(blocked.into());
        }

        let amount = match amount_grams {
            None => self.settings().default_feed_amount_grams,
            Some(amount) => validate_amount(amount).map_err(|err| {
                self.notices.error(err.to_string());
                err
            })?,
        };

        self.view.set_feed_enabled(false);
        self.notices.info("sending feed command...");

        let result = self.backend.feed(amount).await;
        match &result {
            Ok(ack) => {
                self.lock_state().last_feed_at = self.clock.now();
                tracing::info!(amount, "manual feed done");
                self.notices.success(
                    ack.message
                        .clone()
                        .unwrap_or_else(|| "feeding done".to_string()),
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, amount, "manual feed failed");
                self.notices.error(failure_text(
                    err,
                    "feeding failed",
                    "feed request failed, check the network connection",
                ));
            }
        }

        self.schedule_feed_reenable();
        result
    }

    fn schedule_feed_reenable(&self) {
        let state = Arc::clone(&self.state);
        let view = Arc::clone(&self.view);
        let delay = self.policy.feed_reenable;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mode = state.lock().unwrap_or_else(PoisonError::into_inner).mode;
            if mode.allows_manual_feed() {
                view.set_feed_enabled(true);
            }
        });
    }

    // ── Settings ───────────────────────────────────────────────────

    /// Validate and persist new settings.
    ///
    /// `auto_feed_enabled` follows the current mode switch position. On
    /// success the local settings are replaced and the manual feed amount is
    /// pre-filled with the new default.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::Validation`] for unusable numbers and the
    /// backend error when saving fails.
    pub async fn save_settings(
        &self,
        default_feed_amount_grams: f64,
        min_food_level_kg: f64,
    ) -> Result<Ack, FeederError> {
        let auto = self.lock_state().mode.switch_position();
        let settings = Settings::parse(default_feed_amount_grams, min_food_level_kg, auto)
            .map_err(|err| {
                self.notices.error(err.to_string());
                err
            })?;

        match self.backend.save_settings(settings).await {
            Ok(ack) => {
                *self.settings.lock().unwrap_or_else(PoisonError::into_inner) = settings;
                self.view.set_feed_amount(settings.default_feed_amount_grams);
                tracing::info!(
                    default_feed_amount = settings.default_feed_amount_grams,
                    min_food_level = settings.min_food_level_kg,
                    "settings saved"
                );
                self.notices.success("settings saved");
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving settings failed");
                self.notices.error(failure_text(
                    &err,
                    "saving settings failed",
                    "saving settings failed, check the network connection",
                ));
                Err(err)
            }
        }
    }

    // ── Schedules ──────────────────────────────────────────────────

    /// Validate and create a schedule, then resync with a full poll.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::Validation`] for bad input and the backend
    /// error when the request fails.
    pub async fn add_schedule(&self, time: &str, amount_grams: f64) -> Result<Ack, FeederError> {
        let schedule = NewSchedule::parse(time, amount_grams).map_err(|err| {
            self.notices.error(err.to_string());
            err
        })?;

        match self.backend.add_schedule(schedule.clone()).await {
            Ok(ack) => {
                tracing::info!(time = %schedule.time, amount = schedule.amount_grams, "schedule added");
                self.notices.success("feeding schedule added");
                if let Err(err) = self.poll_once().await {
                    tracing::debug!(error = %err, "resync after adding schedule failed");
                }
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!(error = %err, "adding schedule failed");
                self.notices.error(failure_text(
                    &err,
                    "adding schedule failed",
                    "adding schedule failed, check the network connection",
                ));
                Err(err)
            }
        }
    }

    /// Delete a schedule after the user confirms.
    ///
    /// On success the item is removed locally without a resync; the empty
    /// state is rendered when it was the last one.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the request fails.
    pub async fn delete_schedule(&self, id: &ScheduleId) -> Result<DeleteOutcome, FeederError> {
        if !self
            .view
            .confirm("delete this feeding schedule?")
            .await
        {
            tracing::debug!(%id, "schedule deletion declined");
            return Ok(DeleteOutcome::Declined);
        }

        match self.backend.delete_schedule(id.clone()).await {
            Ok(_) => {
                let now_empty = {
                    let mut state = self.lock_state();
                    state.remove_schedule(id);
                    state.schedules.is_empty()
                };
                self.view.remove_schedule(id);
                if now_empty {
                    self.view.render_schedules(&[]);
                }
                tracing::info!(%id, "schedule deleted");
                self.notices.success("feeding schedule deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                tracing::warn!(error = %err, %id, "deleting schedule failed");
                self.notices.error(failure_text(
                    &err,
                    "deleting schedule failed",
                    "deleting schedule failed, check the network connection",
                ));
                Err(err)
            }
        }
    }
}

/// Notice text for a failed request: transport failures get `network`,
/// everything else the server message or `rejected`.
fn failure_text(err: &FeederError, rejected: &str, network: &str) -> String {
    match err {
        FeederError::Network(_) => network.to_string(),
        other => other.user_message(rejected),
    }
}

/// Step-by-step builder for [`Controller`].
pub struct ControllerBuilder<B, V, C> {
    backend: Option<B>,
    view: Option<Arc<V>>,
    clock: Option<C>,
    policy: FeedPolicy,
    settings: Settings,
    initial_mode: FeedMode,
}

impl<B, V, C> Default for ControllerBuilder<B, V, C> {
    fn default() -> Self {
        Self {
            backend: None,
            view: None,
            clock: None,
            policy: FeedPolicy::default(),
            settings: Settings::default(),
            initial_mode: FeedMode::default(),
        }
    }
}

impl<B, V, C> ControllerBuilder<B, V, C>
where
    B: FeederBackend + Send + Sync + 'static,
    V: FeederView,
    C: Clock + 'static,
{
    #[must_use]
    pub fn backend(mut self, backend: B) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn view(mut self, view: Arc<V>) -> Self {
        self.view = Some(view);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: FeedPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn initial_mode(mut self, mode: FeedMode) -> Self {
        self.initial_mode = mode;
        self
    }

    /// Consume the builder and assemble the [`Controller`].
    ///
    /// `last_feed_at` starts backdated by the policy's start-up offset so the
    /// first feed is not held back by a cooldown.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::Setup`] when the backend, view or clock is missing.
    pub fn build(self) -> Result<Controller<B, V, C>, FeederError> {
        let backend = self
            .backend
            .ok_or(SetupError::MissingComponent("backend"))?;
        let view = self.view.ok_or(SetupError::MissingComponent("view"))?;
        let clock = self.clock.ok_or(SetupError::MissingComponent("clock"))?;

        let last_feed_at = backdate(clock.now(), self.policy.startup_backdate);
        let state = ControllerState::new(self.initial_mode, last_feed_at);
        let notices = NoticeBoard::new(Arc::clone(&view), self.policy.notice_ttl);

        Ok(Controller {
            backend,
            view,
            clock,
            policy: self.policy,
            state: Arc::new(Mutex::new(state)),
            settings: Mutex::new(self.settings),
            guard: ModeGuard::new(),
            feeding: ModeGuard::new(),
            notices,
        })
    }
}
