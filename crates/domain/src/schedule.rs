//! Feeding schedule — a daily time at which the backend dispenses food.
//!
//! Schedules are owned by the backend. The controller keeps a read-only copy
//! that is replaced wholesale on every poll.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Identifier assigned by the backend.
///
/// The backend emits integers; strings are accepted too and both are kept in
/// their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScheduleId(String);

impl ScheduleId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScheduleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for ScheduleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(value) => Self(value.to_string()),
            Raw::Text(value) => Self(value),
        })
    }
}

/// A schedule entry as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    /// Time of day, `HH:MM` in 24-hour format.
    pub time: String,
    #[serde(rename = "amount")]
    pub amount_grams: f64,
}

impl Schedule {
    /// Amount formatted for display, e.g. `30g`.
    #[must_use]
    pub fn amount_label(&self) -> String {
        format!("{}g", self.amount_grams)
    }
}

/// A schedule the user wants to add. Validated before it leaves the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSchedule {
    pub time: String,
    #[serde(rename = "amount")]
    pub amount_grams: f64,
}

impl NewSchedule {
    /// Validate user input and build a [`NewSchedule`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyScheduleTime`] when `time` is blank,
    /// [`ValidationError::MalformedScheduleTime`] when it is not `HH:MM`, and
    /// [`ValidationError::NonPositiveAmount`] / [`ValidationError::NotANumber`]
    /// for unusable amounts.
    pub fn parse(time: &str, amount_grams: f64) -> Result<Self, ValidationError> {
        let time = time.trim();
        if time.is_empty() {
            return Err(ValidationError::EmptyScheduleTime);
        }
        let parsed = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|_| ValidationError::MalformedScheduleTime(time.to_string()))?;
        let amount_grams = validate_amount(amount_grams)?;

        Ok(Self {
            time: parsed.format("%H:%M").to_string(),
            amount_grams,
        })
    }
}

/// Check that a gram amount is a usable, positive number.
///
/// # Errors
///
/// Returns [`ValidationError::NotANumber`] for NaN/infinite values and
/// [`ValidationError::NonPositiveAmount`] for zero or negative ones.
pub fn validate_amount(amount_grams: f64) -> Result<f64, ValidationError> {
    if !amount_grams.is_finite() {
        return Err(ValidationError::NotANumber);
    }
    if amount_grams <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount_grams)
}
