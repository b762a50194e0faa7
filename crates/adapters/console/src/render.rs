//! Text rendering of domain values.

use pawfeed_domain::mode::FeedMode;
use pawfeed_domain::readout::{FAILED, FoodBand, SensorReadout};
use pawfeed_domain::schedule::Schedule;

#[must_use]
pub(crate) fn food_band_label(band: FoodBand) -> &'static str {
    match band {
        FoodBand::Low => "low",
        FoodBand::Medium => "medium",
        FoodBand::Normal => "normal",
    }
}

/// One-line summary of a readout.
#[must_use]
pub(crate) fn readout_line(readout: &SensorReadout) -> String {
    format!(
        "temperature {} °C | humidity {} % | food {} kg | cat {} | gauge {:.0}% ({})",
        readout.temperature,
        readout.humidity,
        readout.weight,
        readout.presence.label(),
        readout.food_level.percent,
        food_band_label(readout.food_level.band),
    )
}

pub(crate) fn readout_error_line() -> String {
    format!("temperature {FAILED} | humidity {FAILED} | food {FAILED} | cat {FAILED}")
}

pub(crate) fn mode_line(mode: FeedMode) -> String {
    let feeding = if mode.allows_manual_feed() {
        "enabled"
    } else {
        "disabled"
    };
    format!("mode: {} (manual feeding {feeding})", mode.label())
}

pub(crate) fn schedule_lines(schedules: &[Schedule]) -> Vec<String> {
    if schedules.is_empty() {
        return vec!["no feeding schedules".to_string()];
    }
    schedules
        .iter()
        .map(|s| format!("  #{:<4} {}  {}", s.id.as_str(), s.time, s.amount_label()))
        .collect()
}
