//! Interactive command loop on top of the console view.

use std::io::Write;
use std::sync::Arc;

use pawfeed_adapter_console::ConsoleView;
use pawfeed_app::controller::{Controller, DeleteOutcome, SwitchOutcome};
use pawfeed_app::ports::{Clock, FeederBackend, FeederView};
use tokio::io::AsyncBufRead;

use crate::commands::{self, Command, CommandError, USAGE};

/// Whether the loop should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reads commands from the console and dispatches them to the controller.
pub struct Shell<B, W, R, C> {
    controller: Arc<Controller<B, ConsoleView<W, R>, C>>,
    view: Arc<ConsoleView<W, R>>,
}

impl<B, W, R, C> Shell<B, W, R, C>
where
    B: FeederBackend + Send + Sync + 'static,
    W: Write + Send + 'static,
    R: AsyncBufRead + Unpin + Send + 'static,
    C: Clock + 'static,
{
    pub fn new(
        controller: Arc<Controller<B, ConsoleView<W, R>, C>>,
        view: Arc<ConsoleView<W, R>>,
    ) -> Self {
        Self { controller, view }
    }

    /// Process input lines until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns the read error if the input stream fails.
    pub async fn run(&self) -> std::io::Result<()> {
        while let Some(line) = self.view.next_line().await? {
            match commands::parse(&line) {
                Ok(Some(command)) => {
                    if self.execute(command).await == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(CommandError::Invalid(err)) => {
                    self.controller.notices().error(err.to_string());
                }
                Err(err) => self.view.print(&err.to_string()),
            }
        }
        Ok(())
    }

    /// Run one command.
    pub async fn execute(&self, command: Command) -> Flow {
        tracing::debug!(?command, "executing command");
        match command {
            Command::Status => self.print_status(),
            Command::Feed(amount) => {
                if let Err(err) = self.controller.feed_manual(amount).await {
                    tracing::debug!(error = %err, "feed command failed");
                }
            }
            Command::Mode(mode) => self.report_switch(self.controller.switch_mode(mode).await),
            Command::Toggle => self.report_switch(self.controller.toggle_mode().await),
            Command::Settings {
                default_feed_amount,
                min_food_level,
            } => {
                if let Err(err) = self
                    .controller
                    .save_settings(default_feed_amount, min_food_level)
                    .await
                {
                    tracing::debug!(error = %err, "settings command failed");
                }
            }
            Command::AddSchedule { time, amount } => {
                if let Err(err) = self.controller.add_schedule(&time, amount).await {
                    tracing::debug!(error = %err, "schedule add command failed");
                }
            }
            Command::RemoveSchedule(id) => match self.controller.delete_schedule(&id).await {
                Ok(DeleteOutcome::Declined) => self.view.print("deletion cancelled"),
                Ok(DeleteOutcome::Deleted) => {}
                Err(err) => tracing::debug!(error = %err, "schedule rm command failed"),
            },
            Command::Schedules => self
                .view
                .render_schedules(&self.controller.state().schedules),
            Command::Help => self.view.print(USAGE),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn report_switch(&self, outcome: SwitchOutcome) {
        if matches!(outcome, SwitchOutcome::Ignored) {
            self.view.print("a mode switch is already in progress");
        }
    }

    fn print_status(&self) {
        let state = self.controller.state();
        let settings = self.controller.settings();
        let weight = state
            .current_weight
            .map_or_else(|| "--".to_string(), |w| format!("{w:.3}"));
        let cat = if state.cat_detected { "present" } else { "absent" };
        let switching = if self.controller.is_switching() {
            " (switching)"
        } else {
            ""
        };

        self.view.print(&format!(
            "mode: {}{switching} | cat {cat} | food {weight} kg | last feed {}",
            state.mode.label(),
            state.last_feed_at.format("%H:%M:%S UTC"),
        ));
        self.view.print(&format!(
            "default portion {}g | auto feed below {} kg | {} schedule(s)",
            settings.default_feed_amount_grams,
            settings.min_food_level_kg,
            state.schedules.len(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use pawfeed_app::ports::{Ack, ModeAck, SystemClock};
    use pawfeed_domain::error::FeederError;
    use pawfeed_domain::mode::FeedMode;
    use pawfeed_domain::notice::NoticeKind;
    use pawfeed_domain::schedule::{NewSchedule, Schedule, ScheduleId};
    use pawfeed_domain::settings::Settings;
    use pawfeed_domain::snapshot::SensorSnapshot;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct StubBackend {
        calls: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl FeederBackend for StubBackend {
        async fn fetch_snapshot(&self) -> Result<SensorSnapshot, FeederError> {
            self.record("snapshot".to_string());
            Ok(SensorSnapshot {
                schedules: vec![Schedule {
                    id: ScheduleId::new("1"),
                    time: "08:00".to_string(),
                    amount_grams: 30.0,
                }],
                ..SensorSnapshot::default()
            })
        }

        async fn feed(&self, amount_grams: f64) -> Result<Ack, FeederError> {
            self.record(format!("feed {amount_grams}"));
            Ok(Ack::default())
        }

        async fn set_mode(&self, mode: FeedMode) -> Result<ModeAck, FeederError> {
            self.record(format!("mode {mode}"));
            Ok(ModeAck {
                current_mode: mode,
                message: None,
            })
        }

        async fn save_settings(&self, settings: Settings) -> Result<Ack, FeederError> {
            self.record(format!(
                "settings {} {}",
                settings.default_feed_amount_grams, settings.min_food_level_kg
            ));
            Ok(Ack::default())
        }

        async fn add_schedule(&self, schedule: NewSchedule) -> Result<Ack, FeederError> {
            self.record(format!("add {} {}", schedule.time, schedule.amount_grams));
            Ok(Ack::default())
        }

        async fn delete_schedule(&self, id: ScheduleId) -> Result<Ack, FeederError> {
            self.record(format!("delete {id}"));
            Ok(Ack::default())
        }
    }

    type TestShell = Shell<Arc<StubBackend>, SharedBuf, &'static [u8], SystemClock>;

    fn shell(input: &'static str) -> (TestShell, Arc<StubBackend>, SharedBuf) {
        let backend = Arc::new(StubBackend::default());
        let out = SharedBuf::default();
        let view = Arc::new(ConsoleView::new(out.clone(), input.as_bytes()));
        let controller = Controller::builder()
            .backend(Arc::clone(&backend))
            .view(Arc::clone(&view))
            .clock(SystemClock)
            .build()
            .unwrap();
        (Shell::new(Arc::new(controller), view), backend, out)
    }

    #[tokio::test]
    async fn should_dispatch_commands_until_quit() {
        let (shell, backend, _) = shell("feed 20\nsettings 40 0.8\nquit\nfeed 10\n");

        shell.run().await.unwrap();

        assert_eq!(backend.calls(), vec!["feed 20", "settings 40 0.8"]);
    }

    #[tokio::test]
    async fn should_stop_at_end_of_input() {
        let (shell, backend, _) = shell("mode auto\n");

        shell.run().await.unwrap();

        assert_eq!(backend.calls(), vec!["mode auto"]);
    }

    #[tokio::test]
    async fn should_read_confirmation_from_same_input() {
        let (shell, backend, out) = shell("schedule rm 1\ny\nschedule rm 2\nn\n");

        shell.run().await.unwrap();

        assert_eq!(backend.calls(), vec!["delete 1"]);
        assert!(out.contents().contains("deletion cancelled"));
    }

    #[tokio::test]
    async fn should_resync_after_adding_schedule() {
        let (shell, backend, out) = shell("schedule add 07:05 25\n");

        shell.run().await.unwrap();

        assert_eq!(backend.calls(), vec!["add 07:05 25", "snapshot"]);
        assert!(out.contents().contains("#1"));
    }

    #[tokio::test]
    async fn should_print_parse_errors() {
        let (shell, backend, out) = shell("feed lots\ndance\n");

        shell.run().await.unwrap();

        assert!(backend.calls().is_empty());
        let output = out.contents();
        assert!(output.contains("please enter a valid number"));
        assert!(output.contains("unknown command \"dance\""));
    }

    #[tokio::test(start_paused = true)]
    async fn should_post_invalid_amount_as_expiring_notice() {
        let (shell, backend, out) = shell("feed abc\n");

        shell.run().await.unwrap();

        assert!(backend.calls().is_empty());
        let notice = shell.view.current_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "please enter a valid number");
        assert!(out.contents().contains("[error] please enter a valid number"));

        tokio::time::sleep(Duration::from_millis(5_001)).await;
        assert!(shell.view.current_notice().is_none());
    }

    #[tokio::test]
    async fn should_print_status() {
        let (shell, _, out) = shell("status\n");

        shell.run().await.unwrap();

        let output = out.contents();
        assert!(output.contains("mode: manual mode | cat absent | food -- kg"));
        assert!(output.contains("default portion 30g | auto feed below 0.5 kg | 0 schedule(s)"));
    }

    #[tokio::test]
    async fn should_print_usage_on_help() {
        let (shell, _, out) = shell("help\n");

        shell.run().await.unwrap();

        assert!(out.contents().contains("schedule add <HH:MM> <grams>"));
    }
}
