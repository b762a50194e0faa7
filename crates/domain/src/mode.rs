//! Feeding mode — who decides when the feeder dispenses food.

use serde::{Deserialize, Serialize};

/// Operating mode of the feeder.
///
/// In [`Manual`](Self::Manual) mode food is only dispensed on request. In
/// [`Auto`](Self::Auto) mode the controller feeds on its own when the cat is
/// present and the bowl runs low, and the backend runs the schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    #[default]
    Manual,
    Auto,
}

impl FeedMode {
    /// Position of the mode switch for this mode.
    #[must_use]
    pub fn switch_position(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::Auto,
            Self::Auto => Self::Manual,
        }
    }

    /// Whether the manual feed control is usable in this mode.
    #[must_use]
    pub fn allows_manual_feed(self) -> bool {
        matches!(self, Self::Manual)
    }

    /// Human-readable label for the mode display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual mode",
            Self::Auto => "auto mode",
        }
    }
}

impl std::fmt::Display for FeedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => f.write_str("manual"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feeding mode {0:?}, expected \"manual\" or \"auto\"")]
pub struct UnknownModeError(pub String);

impl std::str::FromStr for FeedMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "auto" => Ok(Self::Auto),
            other => Err(UnknownModeError(other.to_string())),
        }
    }
}
