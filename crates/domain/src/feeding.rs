//! Feeding policy — cooldowns, settle delays and the auto-feed decision.
//!
//! Everything here is pure: the caller supplies the current time and the
//! state snapshot, so the rules can be tested without timers.

use std::time::Duration;

use crate::error::BlockedError;
use crate::mode::FeedMode;
use crate::state::ControllerState;
use crate::time::{Timestamp, elapsed_between};

/// Timing knobs of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPolicy {
    /// Interval between two backend polls.
    pub poll_interval: Duration,
    /// How long the mode guard stays held after a mode request resolves.
    pub mode_settle: Duration,
    /// Delay before the manual feed control is re-enabled.
    pub feed_reenable: Duration,
    /// Minimum time between two manual feeds.
    pub manual_cooldown: Duration,
    /// Minimum time between two automatic feeds.
    pub auto_cooldown: Duration,
    /// How far `last_feed_at` is pushed back after a failed auto feed.
    ///
    /// Tunable. Values below `auto_cooldown` leave a partial cooldown in place.
    pub failure_rollback: Duration,
    /// How long a notice stays visible.
    pub notice_ttl: Duration,
    /// How far `last_feed_at` is backdated at start-up.
    pub startup_backdate: Duration,
}

impl Default for FeedPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            mode_settle: Duration::from_millis(500),
            feed_reenable: Duration::from_secs(1),
            manual_cooldown: Duration::from_secs(5),
            auto_cooldown: Duration::from_secs(10),
            failure_rollback: Duration::from_secs(8),
            notice_ttl: Duration::from_secs(5),
            startup_backdate: Duration::from_secs(15),
        }
    }
}

/// Inputs of the auto-feed decision, captured at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoFeedInput {
    pub mode: FeedMode,
    pub switching: bool,
    pub cat_detected: bool,
    pub current_weight: Option<f64>,
    pub min_food_level: f64,
    pub last_feed_at: Timestamp,
    pub now: Timestamp,
}

impl AutoFeedInput {
    /// Capture the decision inputs from the controller state.
    #[must_use]
    pub fn capture(
        state: &ControllerState,
        switching: bool,
        min_food_level: f64,
        now: Timestamp,
    ) -> Self {
        Self {
            mode: state.mode,
            switching,
            cat_detected: state.cat_detected,
            current_weight: state.current_weight,
            min_food_level,
            last_feed_at: state.last_feed_at,
            now,
        }
    }
}

impl FeedPolicy {
    /// Whether the auto cooldown has fully elapsed.
    #[must_use]
    pub fn auto_cooldown_elapsed(&self, last_feed_at: Timestamp, now: Timestamp) -> bool {
        elapsed_between(last_feed_at, now) > self.auto_cooldown
    }

    /// Decide whether the controller should dispense food on its own.
    ///
    /// All of the following must hold: auto mode, no mode switch in flight,
    /// cat present, a known weight below the threshold, and the auto
    /// cooldown strictly exceeded.
    #[must_use]
    pub fn should_auto_feed(&self, input: &AutoFeedInput) -> bool {
        if input.mode != FeedMode::Auto || input.switching {
            return false;
        }
        let Some(weight) = input.current_weight else {
            return false;
        };
        input.cat_detected
            && weight < input.min_food_level
            && self.auto_cooldown_elapsed(input.last_feed_at, input.now)
    }

    /// Check the preconditions of a manual feed.
    ///
    /// # Errors
    ///
    /// Returns [`BlockedError::AutoMode`] outside manual mode and
    /// [`BlockedError::CoolingDown`] when the previous feed is not older than
    /// the manual cooldown.
    pub fn check_manual_feed(
        &self,
        mode: FeedMode,
        last_feed_at: Timestamp,
        now: Timestamp,
    ) -> Result<(), BlockedError> {
        if !mode.allows_manual_feed() {
            return Err(BlockedError::AutoMode);
        }
        let elapsed = elapsed_between(last_feed_at, now);
        if elapsed <= self.manual_cooldown {
            return Err(BlockedError::CoolingDown {
                remaining: self.manual_cooldown.saturating_sub(elapsed),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;
    use chrono::TimeDelta;

    fn ready_input() -> AutoFeedInput {
        let now = now();
        AutoFeedInput {
            mode: FeedMode::Auto,
            switching: false,
            cat_detected: true,
            current_weight: Some(0.3),
            min_food_level: 0.5,
            last_feed_at: now - TimeDelta::milliseconds(11_000),
            now,
        }
    }

    #[test]
    fn should_feed_when_every_condition_holds() {
        assert!(FeedPolicy::default().should_auto_feed(&ready_input()));
    }

    #[test]
    fn should_not_feed_in_manual_mode() {
        let input = AutoFeedInput {
            mode: FeedMode::Manual,
            ..ready_input()
        };
        assert!(!FeedPolicy::default().should_auto_feed(&input));
    }

    #[test]
    fn should_not_feed_while_switching() {
        let input = AutoFeedInput {
            switching: true,
            ..ready_input()
        };
        assert!(!FeedPolicy::default().should_auto_feed(&input));
    }

    #[test]
    fn should_not_feed_without_cat() {
        let input = AutoFeedInput {
            cat_detected: false,
            ..ready_input()
        };
        assert!(!FeedPolicy::default().should_auto_feed(&input));
    }

    #[test]
    fn should_not_feed_without_weight_reading() {
        let input = AutoFeedInput {
            current_weight: None,
            ..ready_input()
        };
        assert!(!FeedPolicy::default().should_auto_feed(&input));
    }

    #[test]
    fn should_not_feed_when_bowl_is_full_enough() {
        let input = AutoFeedInput {
            current_weight: Some(0.5),
            ..ready_input()
        };
        assert!(!FeedPolicy::default().should_auto_feed(&input));
    }

    #[test]
    fn should_not_feed_before_cooldown_strictly_elapsed() {
        let base = ready_input();
        let input = AutoFeedInput {
            last_feed_at: base.now - TimeDelta::milliseconds(10_000),
            ..base
        };
        assert!(!FeedPolicy::default().should_auto_feed(&input));
    }

    #[test]
    fn should_allow_manual_feed_after_cooldown() {
        let now = now();
        let result = FeedPolicy::default().check_manual_feed(
            FeedMode::Manual,
            now - TimeDelta::milliseconds(5_001),
            now,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn should_block_manual_feed_in_auto_mode() {
        let now = now();
        let result = FeedPolicy::default().check_manual_feed(
            FeedMode::Auto,
            now - TimeDelta::seconds(60),
            now,
        );
        assert_eq!(result, Err(BlockedError::AutoMode));
    }

    #[test]
    fn should_block_manual_feed_within_cooldown() {
        let now = now();
        let result = FeedPolicy::default().check_manual_feed(
            FeedMode::Manual,
            now - TimeDelta::milliseconds(2_000),
            now,
        );
        assert_eq!(
            result,
            Err(BlockedError::CoolingDown {
                remaining: Duration::from_millis(3_000)
            })
        );
    }

    #[test]
    fn should_capture_input_from_state() {
        let now = now();
        let mut state = ControllerState::new(FeedMode::Auto, now);
        state.cat_detected = true;
        state.current_weight = Some(0.2);

        let input = AutoFeedInput::capture(&state, true, 0.4, now);

        assert_eq!(input.mode, FeedMode::Auto);
        assert!(input.switching);
        assert!(input.cat_detected);
        assert_eq!(input.current_weight, Some(0.2));
        assert_eq!(input.last_feed_at, now);
    }
}
