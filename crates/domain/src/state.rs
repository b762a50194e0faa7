//! Controller state — the single mutable record the controller owns.

use crate::mode::FeedMode;
use crate::schedule::{Schedule, ScheduleId};
use crate::snapshot::SensorSnapshot;
use crate::time::Timestamp;

/// Everything the controller remembers between poll cycles.
///
/// The mode-switch guard is deliberately *not* part of this struct; it lives
/// in the application layer and is passed to the evaluator alongside a
/// snapshot of this state.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub mode: FeedMode,
    /// Last time food was dispensed (or optimistically assumed to be).
    pub last_feed_at: Timestamp,
    pub cat_detected: bool,
    /// Bowl weight in kg, `None` when the scale gave no usable reading.
    pub current_weight: Option<f64>,
    /// Cached copy of the backend's schedules.
    pub schedules: Vec<Schedule>,
}

/// What changed while applying a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reconciliation {
    /// Set when the server reported a mode different from the local one.
    pub mode_changed: Option<FeedMode>,
}

impl ControllerState {
    /// Fresh state at start-up.
    #[must_use]
    pub fn new(mode: FeedMode, last_feed_at: Timestamp) -> Self {
        Self {
            mode,
            last_feed_at,
            cat_detected: false,
            current_weight: None,
            schedules: Vec::new(),
        }
    }

    /// Apply a poll snapshot to the state.
    ///
    /// Sensor fields are always overwritten; the mode is adopted only when the
    /// server reports one and it differs from the local mode; the schedule
    /// list is replaced wholesale.
    pub fn reconcile(&mut self, snapshot: &SensorSnapshot) -> Reconciliation {
        self.current_weight = snapshot.weight_kg();
        self.cat_detected = snapshot.cat_detected == Some(true);
        self.schedules.clone_from(&snapshot.schedules);

        let mut outcome = Reconciliation::default();
        if let Some(mode) = snapshot.mode
            && mode != self.mode
        {
            self.mode = mode;
            outcome.mode_changed = Some(mode);
        }
        outcome
    }

    /// Drop a schedule from the cache. Returns whether it was present.
    pub fn remove_schedule(&mut self, id: &ScheduleId) -> bool {
        let before = self.schedules.len();
        self.schedules.retain(|s| &s.id != id);
        self.schedules.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    fn schedule(id: &str) -> Schedule {
        Schedule {
            id: ScheduleId::new(id),
            time: "08:00".to_string(),
            amount_grams: 30.0,
        }
    }

    #[test]
    fn should_start_without_readings() {
        let state = ControllerState::new(FeedMode::Manual, now());
        assert!(!state.cat_detected);
        assert!(state.current_weight.is_none());
        assert!(state.schedules.is_empty());
    }

    #[test]
    fn should_overwrite_sensor_fields_on_reconcile() {
        let mut state = ControllerState::new(FeedMode::Manual, now());
        state.cat_detected = true;
        state.current_weight = Some(1.0);

        let outcome = state.reconcile(&SensorSnapshot::default());

        assert!(!state.cat_detected);
        assert!(state.current_weight.is_none());
        assert_eq!(outcome.mode_changed, None);
    }

    #[test]
    fn should_adopt_server_mode_when_different() {
        let mut state = ControllerState::new(FeedMode::Manual, now());
        let snapshot = SensorSnapshot {
            mode: Some(FeedMode::Auto),
            ..SensorSnapshot::default()
        };

        let outcome = state.reconcile(&snapshot);

        assert_eq!(state.mode, FeedMode::Auto);
        assert_eq!(outcome.mode_changed, Some(FeedMode::Auto));
    }

    #[test]
    fn should_not_report_change_when_server_mode_matches() {
        let mut state = ControllerState::new(FeedMode::Auto, now());
        let snapshot = SensorSnapshot {
            mode: Some(FeedMode::Auto),
            ..SensorSnapshot::default()
        };
        assert_eq!(state.reconcile(&snapshot).mode_changed, None);
    }

    #[test]
    fn should_replace_schedules_wholesale() {
        let mut state = ControllerState::new(FeedMode::Manual, now());
        state.schedules = vec![schedule("1"), schedule("2")];
        let snapshot = SensorSnapshot {
            schedules: vec![schedule("3")],
            ..SensorSnapshot::default()
        };

        state.reconcile(&snapshot);

        assert_eq!(state.schedules, vec![schedule("3")]);
    }

    #[test]
    fn should_remove_cached_schedule() {
        let mut state = ControllerState::new(FeedMode::Manual, now());
        state.schedules = vec![schedule("1"), schedule("2")];

        assert!(state.remove_schedule(&ScheduleId::new("1")));
        assert!(!state.remove_schedule(&ScheduleId::new("1")));
        assert_eq!(state.schedules, vec![schedule("2")]);
    }
}
