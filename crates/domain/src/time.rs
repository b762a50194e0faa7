//! Time and timestamp helpers.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// UTC timestamp used for `last_feed_at` and every clock reading.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Time elapsed from `earlier` to `later`, saturating at zero when the
/// clock went backwards.
#[must_use]
pub fn elapsed_between(earlier: Timestamp, later: Timestamp) -> Duration {
    (later - earlier).to_std().unwrap_or(Duration::ZERO)
}

/// Shift `ts` into the past by `offset`.
#[must_use]
pub fn backdate(ts: Timestamp, offset: Duration) -> Timestamp {
    TimeDelta::from_std(offset)
        .ok()
        .and_then(|delta| ts.checked_sub_signed(delta))
        .unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_measure_elapsed_time() {
        let start = now();
        let later = start + TimeDelta::milliseconds(1500);
        assert_eq!(elapsed_between(start, later), Duration::from_millis(1500));
    }

    #[test]
    fn should_saturate_elapsed_time_when_clock_goes_backwards() {
        let start = now();
        let earlier = start - TimeDelta::seconds(3);
        assert_eq!(elapsed_between(start, earlier), Duration::ZERO);
    }

    #[test]
    fn should_backdate_by_offset() {
        let ts = now();
        let back = backdate(ts, Duration::from_secs(8));
        assert_eq!(ts - back, TimeDelta::seconds(8));
    }
}
