//! Feeder settings — default portion, low-food threshold and the auto flag.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schedule::validate_amount;

/// Default portion dispensed when no explicit amount is given.
pub const DEFAULT_FEED_AMOUNT_GRAMS: f64 = 30.0;

/// Bowl weight (kg) under which auto mode considers the food low.
pub const DEFAULT_MIN_FOOD_LEVEL_KG: f64 = 0.5;

/// Settings shared with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "default_feed_amount")]
    pub default_feed_amount_grams: f64,
    #[serde(rename = "min_food_level")]
    pub min_food_level_kg: f64,
    pub auto_feed_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_feed_amount_grams: DEFAULT_FEED_AMOUNT_GRAMS,
            min_food_level_kg: DEFAULT_MIN_FOOD_LEVEL_KG,
            auto_feed_enabled: false,
        }
    }
}

impl Settings {
    /// Validate user input and build [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotANumber`] when either value is not a
    /// finite number, and [`ValidationError::NonPositiveAmount`] when the
    /// default portion is not positive.
    pub fn parse(
        default_feed_amount_grams: f64,
        min_food_level_kg: f64,
        auto_feed_enabled: bool,
    ) -> Result<Self, ValidationError> {
        if !min_food_level_kg.is_finite() {
            return Err(ValidationError::NotANumber);
        }
        let default_feed_amount_grams = validate_amount(default_feed_amount_grams)?;
        Ok(Self {
            default_feed_amount_grams,
            min_food_level_kg,
            auto_feed_enabled,
        })
    }
}
