//! Sensor snapshot — one poll's worth of backend state.

use serde::{Deserialize, Serialize};

use crate::mode::FeedMode;
use crate::schedule::Schedule;

/// Decoded payload of the backend's sensor endpoint.
///
/// Every reading may be missing (sensor not ready, hardware fault), so all
/// fields are optional except `schedules`, which defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSnapshot {
    /// Ambient temperature in °C.
    pub temperature: Option<f64>,
    /// Relative humidity in %.
    pub humidity: Option<f64>,
    /// Food left in the bowl, in kg.
    pub weight: Option<f64>,
    pub cat_detected: Option<bool>,
    pub mode: Option<FeedMode>,
    pub schedules: Vec<Schedule>,
    pub scheduled_feed: Option<bool>,
    pub feed_success: Option<bool>,
    pub feed_message: Option<String>,
    pub feed_cooldown: Option<bool>,
    /// Seconds left before the backend accepts another scheduled feed.
    pub cooldown_time: Option<f64>,
    pub feed_amount: Option<f64>,
}

/// Outcome of a backend-run scheduled feed, reported alongside a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduledFeed {
    /// The backend dispensed the scheduled portion.
    Fed { message: String },
    /// The schedule fired but the backend is still cooling down.
    CoolingDown { message: String },
    /// The schedule fired and the backend reported a problem.
    Failed { message: String },
    /// The schedule fired without further details.
    Triggered { message: String },
}

impl SensorSnapshot {
    /// Whether the weight reading is usable.
    #[must_use]
    pub fn weight_kg(&self) -> Option<f64> {
        self.weight.filter(|w| w.is_finite())
    }

    /// Interpret the scheduled-feed fields, if a schedule fired this cycle.
    #[must_use]
    pub fn scheduled_feed(&self) -> Option<ScheduledFeed> {
        if self.scheduled_feed != Some(true) {
            return None;
        }

        let amount = self
            .feed_amount
            .map_or_else(|| "?".to_string(), |a| a.to_string());

        let outcome = if self.feed_success == Some(true) {
            ScheduledFeed::Fed {
                message: self
                    .feed_message
                    .clone()
                    .unwrap_or_else(|| format!("scheduled feeding triggered, dispensing {amount}g")),
            }
        } else if self.feed_cooldown == Some(true) {
            let remaining = self
                .cooldown_time
                .map_or_else(|| "?".to_string(), |t| t.to_string());
            ScheduledFeed::CoolingDown {
                message: self
                    .feed_message
                    .clone()
                    .unwrap_or_else(|| format!("feeder cooling down, {remaining}s left")),
            }
        } else if let Some(message) = &self.feed_message {
            ScheduledFeed::Failed {
                message: message.clone(),
            }
        } else {
            ScheduledFeed::Triggered {
                message: format!("scheduled feeding triggered, dispensing {amount}g"),
            }
        };

        Some(outcome)
    }
}
