//! View port — the presentation surface driven by the controller.

use std::future::Future;

use pawfeed_domain::mode::FeedMode;
use pawfeed_domain::notice::Notice;
use pawfeed_domain::readout::SensorReadout;
use pawfeed_domain::schedule::{Schedule, ScheduleId};

/// Presentation surface of the feeder controller.
///
/// Rendering calls are synchronous and must not block; only
/// [`confirm`](Self::confirm) waits for the user.
pub trait FeederView: Send + Sync + 'static {
    /// Show the latest sensor readings and food gauge.
    fn render_readout(&self, readout: &SensorReadout);

    /// Mark every reading as failed after an unsuccessful poll.
    fn render_readout_error(&self);

    /// Reflect the mode: switch position, label and feed control state.
    fn render_mode(&self, mode: FeedMode);

    /// Enable or disable the manual feed control.
    fn set_feed_enabled(&self, enabled: bool);

    /// Pre-fill the manual feed amount.
    fn set_feed_amount(&self, amount_grams: f64);

    /// Replace the whole schedule list. An empty slice shows the empty state.
    fn render_schedules(&self, schedules: &[Schedule]);

    /// Remove one schedule item from the list without re-rendering the rest.
    fn remove_schedule(&self, id: &ScheduleId);

    /// Display a notice, replacing the current one.
    fn show_notice(&self, notice: &Notice);

    /// Clear the notice area.
    fn clear_notice(&self);

    /// Ask the user a yes/no question.
    fn confirm(&self, question: &str) -> impl Future<Output = bool> + Send;
}
