//! [`FeederView`] implementation writing to a text sink.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use pawfeed_app::ports::FeederView;
use pawfeed_domain::mode::FeedMode;
use pawfeed_domain::notice::Notice;
use pawfeed_domain::readout::SensorReadout;
use pawfeed_domain::schedule::{Schedule, ScheduleId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::render::{mode_line, readout_error_line, readout_line, schedule_lines};

/// Console presentation of the feeder.
///
/// Output goes to `W` line by line. Input lines are read from `R`, either by
/// the command loop through [`next_line`](Self::next_line) or by
/// [`confirm`](FeederView::confirm).
pub struct ConsoleView<W, R> {
    out: Mutex<W>,
    input: tokio::sync::Mutex<Lines<R>>,
    notice: Mutex<Option<Notice>>,
}

impl<W, R> ConsoleView<W, R>
where
    W: Write + Send + 'static,
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(out: W, input: R) -> Self {
        Self {
            out: Mutex::new(out),
            input: tokio::sync::Mutex::new(input.lines()),
            notice: Mutex::new(None),
        }
    }

    /// Read the next input line. `None` at end of input.
    ///
    /// # Errors
    ///
    /// Propagates read failures of the underlying reader.
    pub async fn next_line(&self) -> std::io::Result<Option<String>> {
        self.input.lock().await.next_line().await
    }

    /// The notice currently on display.
    #[must_use]
    pub fn current_notice(&self) -> Option<Notice> {
        self.notice
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write a free-form line, e.g. a command result.
    pub fn print(&self, line: &str) {
        self.write_lines(std::iter::once(line));
    }

    /// Consume the view and return the output sink.
    pub fn into_output(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        for line in lines {
            if let Err(err) = writeln!(out, "{line}") {
                tracing::warn!(error = %err, "failed to write to console");
                return;
            }
        }
        if let Err(err) = out.flush() {
            tracing::warn!(error = %err, "failed to flush console");
        }
    }
}

impl<W, R> FeederView for ConsoleView<W, R>
where
    W: Write + Send + 'static,
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn render_readout(&self, readout: &SensorReadout) {
        self.print(&readout_line(readout));
    }

    fn render_readout_error(&self) {
        self.print(&readout_error_line());
    }

    fn render_mode(&self, mode: FeedMode) {
        self.print(&mode_line(mode));
    }

    fn set_feed_enabled(&self, enabled: bool) {
        tracing::debug!(enabled, "feed control toggled");
        self.print(if enabled {
            "manual feeding ready"
        } else {
            "manual feeding busy"
        });
    }

    fn set_feed_amount(&self, amount_grams: f64) {
        self.print(&format!("feed amount set to {amount_grams}g"));
    }

    fn render_schedules(&self, schedules: &[Schedule]) {
        let lines = schedule_lines(schedules);
        self.write_lines(lines.iter().map(String::as_str));
    }

    fn remove_schedule(&self, id: &ScheduleId) {
        self.print(&format!("schedule #{id} removed"));
    }

    fn show_notice(&self, notice: &Notice) {
        self.print(&format!("[{}] {}", notice.kind, notice.text));
        *self.notice.lock().unwrap_or_else(PoisonError::into_inner) = Some(notice.clone());
    }

    fn clear_notice(&self) {
        self.notice
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    async fn confirm(&self, question: &str) -> bool {
        self.print(&format!("{question} [y/N]"));
        match self.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read confirmation");
                false
            }
        }
    }
}
