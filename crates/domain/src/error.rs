//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`FeederError`]
//! via `#[from]` (or an explicit `From` impl in adapter crates).

use std::time::Duration;

/// Top-level error returned by controller operations and backend ports.
#[derive(Debug, thiserror::Error)]
pub enum FeederError {
    /// Client-side input check failed; nothing was sent.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A feed precondition refused the action; nothing was sent.
    #[error("action blocked")]
    Blocked(#[from] BlockedError),

    /// The backend answered, but not with a success status.
    #[error("request rejected")]
    Rejected(#[from] RejectedError),

    /// The request could not complete (transport failure or unreadable body).
    #[error("network error")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The controller could not be assembled.
    #[error("setup error")]
    Setup(#[from] SetupError),
}

impl FeederError {
    /// Text suitable for a user-facing notice.
    ///
    /// Rejections carrying a server message use it verbatim, local refusals
    /// describe themselves, and everything else falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Blocked(err) => err.to_string(),
            Self::Rejected(RejectedError {
                message: Some(message),
                ..
            }) if !message.is_empty() => message.clone(),
            Self::Setup(err) => err.to_string(),
            Self::Rejected(_) | Self::Network(_) => fallback.to_string(),
        }
    }
}

/// Client-side input validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("please enter a valid number")]
    NotANumber,

    #[error("feed amount must be greater than zero")]
    NonPositiveAmount,

    #[error("please choose a feeding time")]
    EmptyScheduleTime,

    #[error("feeding time must use the HH:MM format, got {0:?}")]
    MalformedScheduleTime(String),
}

/// Reasons a manual feed is refused before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockedError {
    #[error("switch to manual mode first")]
    AutoMode,

    #[error("feeding too often, please wait")]
    CoolingDown { remaining: Duration },

    #[error("a feed is already in progress")]
    InFlight,
}

/// A non-success answer from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedError {
    /// HTTP status when it was not 2xx.
    pub status: Option<u16>,
    /// Server-provided explanation, if the body carried one.
    pub message: Option<String>,
}

impl std::fmt::Display for RejectedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("server rejected the request (status: ")?;
        match self.status {
            Some(status) => write!(f, "{status}")?,
            None => f.write_str("-")?,
        }
        write!(f, ", message: {})", self.message.as_deref().unwrap_or("-"))
    }
}

impl std::error::Error for RejectedError {}

/// Failure to assemble the controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("missing required component: {0}")]
    MissingComponent(&'static str),
}
