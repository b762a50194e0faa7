//! Readout formatting — how sensor values and the food gauge are shown.

use crate::snapshot::SensorSnapshot;

/// Bowl capacity used to scale the food gauge, in kg.
pub const FOOD_GAUGE_CAPACITY_KG: f64 = 2.0;

/// Placeholder for a missing reading.
pub const MISSING: &str = "--";

/// Placeholder shown in every field when the poll failed.
pub const FAILED: &str = "error";

/// Presence indicator for the cat sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Detected,
    NotDetected,
    Unknown,
}

impl Presence {
    #[must_use]
    pub fn from_reading(reading: Option<bool>) -> Self {
        match reading {
            Some(true) => Self::Detected,
            Some(false) => Self::NotDetected,
            None => Self::Unknown,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Detected => "detected",
            Self::NotDetected => "not detected",
            Self::Unknown => "unknown",
        }
    }
}

/// Colour band of the food gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodBand {
    Low,
    Medium,
    Normal,
}

/// Fill level of the food gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodLevel {
    /// Fill percentage, clamped to `0..=100`.
    pub percent: f64,
    pub band: FoodBand,
}

impl FoodLevel {
    /// Gauge level for a bowl weight in kg. Unknown weights read as empty.
    #[must_use]
    pub fn from_weight(weight_kg: Option<f64>) -> Self {
        let percent = weight_kg
            .filter(|w| w.is_finite())
            .map_or(0.0, |w| (w / FOOD_GAUGE_CAPACITY_KG * 100.0).clamp(0.0, 100.0));
        let band = if percent < 20.0 {
            FoodBand::Low
        } else if percent < 40.0 {
            FoodBand::Medium
        } else {
            FoodBand::Normal
        };
        Self { percent, band }
    }
}

/// Display-ready strings for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReadout {
    pub temperature: String,
    pub humidity: String,
    pub weight: String,
    pub presence: Presence,
    pub food_level: FoodLevel,
}

impl SensorReadout {
    #[must_use]
    pub fn from_snapshot(snapshot: &SensorSnapshot) -> Self {
        Self {
            temperature: format_reading(snapshot.temperature, 1),
            humidity: format_reading(snapshot.humidity, 1),
            weight: format_reading(snapshot.weight_kg(), 3),
            presence: Presence::from_reading(snapshot.cat_detected),
            food_level: FoodLevel::from_weight(snapshot.weight_kg()),
        }
    }
}

fn format_reading(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => MISSING.to_string(),
    }
}
