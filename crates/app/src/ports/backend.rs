//! Backend port — the feeder's HTTP API as seen by the controller.

use std::future::Future;

use pawfeed_domain::error::FeederError;
use pawfeed_domain::mode::FeedMode;
use pawfeed_domain::schedule::{NewSchedule, ScheduleId};
use pawfeed_domain::settings::Settings;
use pawfeed_domain::snapshot::SensorSnapshot;

/// Acknowledgement of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    /// Server-provided text, if any.
    pub message: Option<String>,
}

/// Acknowledgement of a successful mode change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeAck {
    /// Mode the server actually applied.
    pub current_mode: FeedMode,
    pub message: Option<String>,
}

/// Commands and queries understood by the feeder backend.
///
/// Implementations map transport failures to [`FeederError::Network`] and
/// any answer that is not a success to [`FeederError::Rejected`].
pub trait FeederBackend {
    /// Fetch the current sensor readings, mode and schedules.
    fn fetch_snapshot(&self) -> impl Future<Output = Result<SensorSnapshot, FeederError>> + Send;

    /// Dispense `amount_grams` of food.
    fn feed(&self, amount_grams: f64) -> impl Future<Output = Result<Ack, FeederError>> + Send;

    /// Ask the backend to switch to `mode`.
    fn set_mode(&self, mode: FeedMode)
    -> impl Future<Output = Result<ModeAck, FeederError>> + Send;

    /// Persist the feeder settings.
    fn save_settings(
        &self,
        settings: Settings,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send;

    /// Create a schedule.
    fn add_schedule(
        &self,
        schedule: NewSchedule,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send;

    /// Delete a schedule by id.
    fn delete_schedule(
        &self,
        id: ScheduleId,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send;
}

impl<T: FeederBackend + Send + Sync> FeederBackend for std::sync::Arc<T> {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<SensorSnapshot, FeederError>> + Send {
        (**self).fetch_snapshot()
    }

    fn feed(&self, amount_grams: f64) -> impl Future<Output = Result<Ack, FeederError>> + Send {
        (**self).feed(amount_grams)
    }

    fn set_mode(
        &self,
        mode: FeedMode,
    ) -> impl Future<Output = Result<ModeAck, FeederError>> + Send {
        (**self).set_mode(mode)
    }

    fn save_settings(
        &self,
        settings: Settings,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send {
        (**self).save_settings(settings)
    }

    fn add_schedule(
        &self,
        schedule: NewSchedule,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send {
        (**self).add_schedule(schedule)
    }

    fn delete_schedule(
        &self,
        id: ScheduleId,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send {
        (**self).delete_schedule(id)
    }
}
