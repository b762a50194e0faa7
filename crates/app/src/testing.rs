//! In-memory fakes of the ports, shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::TimeDelta;
use pawfeed_domain::error::{FeederError, RejectedError};
use pawfeed_domain::mode::FeedMode;
use pawfeed_domain::notice::{Notice, NoticeKind};
use pawfeed_domain::readout::SensorReadout;
use pawfeed_domain::schedule::{NewSchedule, Schedule, ScheduleId};
use pawfeed_domain::settings::Settings;
use pawfeed_domain::snapshot::SensorSnapshot;
use pawfeed_domain::time::Timestamp;

use crate::ports::{Ack, Clock, FeederBackend, FeederView, ModeAck};

// ── Backend ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Snapshot,
    Feed(f64),
    SetMode(FeedMode),
    SaveSettings(Settings),
    AddSchedule(NewSchedule),
    DeleteSchedule(ScheduleId),
}

/// Scripted answer for a command.
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Option<String>),
    Rejected(Option<String>),
    Network,
}

impl Reply {
    fn into_result(self) -> Result<Option<String>, FeederError> {
        match self {
            Self::Ok(message) => Ok(message),
            Self::Rejected(message) => Err(RejectedError {
                status: None,
                message,
            }
            .into()),
            Self::Network => Err(FeederError::Network("connection refused".into())),
        }
    }
}

/// Backend recording every call.
///
/// Each command pops its next scripted reply, falling back to a bare
/// success once the script is exhausted.
#[derive(Default)]
pub struct FakeBackend {
    pub calls: Mutex<Vec<Call>>,
    pub snapshot: Mutex<Option<SensorSnapshot>>,
    pub replies: Mutex<VecDeque<Reply>>,
    pub set_mode_delay: Mutex<Duration>,
    pub feed_delay: Mutex<Duration>,
}

impl FakeBackend {
    pub fn with_snapshot(snapshot: SensorSnapshot) -> Self {
        let backend = Self::default();
        backend.set_snapshot(Some(snapshot));
        backend
    }

    pub fn set_snapshot(&self, snapshot: Option<SensorSnapshot>) {
        *self.snapshot.lock().unwrap() = snapshot;
    }

    pub fn reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn delay_set_mode(&self, delay: Duration) {
        *self.set_mode_delay.lock().unwrap() = delay;
    }

    pub fn delay_feed(&self, delay: Duration) {
        *self.feed_delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn feeds(&self) -> Vec<f64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Feed(amount) => Some(amount),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: Call) -> Result<Option<String>, FeederError> {
        self.calls.lock().unwrap().push(call);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Ok(None))
            .into_result()
    }
}

impl FeederBackend for FakeBackend {
    async fn fetch_snapshot(&self) -> Result<SensorSnapshot, FeederError> {
        self.calls.lock().unwrap().push(Call::Snapshot);
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| FeederError::Network("sensor endpoint unreachable".into()))
    }

    async fn feed(&self, amount_grams: f64) -> Result<Ack, FeederError> {
        let delay = *self.feed_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let message = self.record(Call::Feed(amount_grams))?;
        Ok(Ack { message })
    }

    async fn set_mode(&self, mode: FeedMode) -> Result<ModeAck, FeederError> {
        let delay = *self.set_mode_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let message = self.record(Call::SetMode(mode))?;
        Ok(ModeAck {
            current_mode: mode,
            message,
        })
    }

    async fn save_settings(&self, settings: Settings) -> Result<Ack, FeederError> {
        let message = self.record(Call::SaveSettings(settings))?;
        Ok(Ack { message })
    }

    async fn add_schedule(&self, schedule: NewSchedule) -> Result<Ack, FeederError> {
        let message = self.record(Call::AddSchedule(schedule))?;
        Ok(Ack { message })
    }

    async fn delete_schedule(&self, id: ScheduleId) -> Result<Ack, FeederError> {
        let message = self.record(Call::DeleteSchedule(id))?;
        Ok(Ack { message })
    }
}

// ── View ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Readout(SensorReadout),
    ReadoutError,
    Mode(FeedMode),
    FeedEnabled(bool),
    FeedAmount(f64),
    Schedules(Vec<Schedule>),
    Removed(ScheduleId),
    Notice(NoticeKind, String),
    ClearNotice,
}

/// View recording every render call.
#[derive(Default)]
pub struct RecordingView {
    pub events: Mutex<Vec<Rendered>>,
    pub confirm_answer: Mutex<bool>,
}

impl RecordingView {
    pub fn answering(confirm: bool) -> Self {
        let view = Self::default();
        *view.confirm_answer.lock().unwrap() = confirm;
        view
    }

    pub fn events(&self) -> Vec<Rendered> {
        self.events.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Rendered::Notice(kind, text) => Some((kind, text)),
                _ => None,
            })
            .collect()
    }

    pub fn last_notice(&self) -> Option<(NoticeKind, String)> {
        self.notices().pop()
    }

    pub fn last_mode(&self) -> Option<FeedMode> {
        self.events().into_iter().rev().find_map(|event| match event {
            Rendered::Mode(mode) => Some(mode),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn push(&self, event: Rendered) {
        self.events.lock().unwrap().push(event);
    }
}

impl FeederView for RecordingView {
    fn render_readout(&self, readout: &SensorReadout) {
        self.push(Rendered::Readout(readout.clone()));
    }

    fn render_readout_error(&self) {
        self.push(Rendered::ReadoutError);
    }

    fn render_mode(&self, mode: FeedMode) {
        self.push(Rendered::Mode(mode));
    }

    fn set_feed_enabled(&self, enabled: bool) {
        self.push(Rendered::FeedEnabled(enabled));
    }

    fn set_feed_amount(&self, amount_grams: f64) {
        self.push(Rendered::FeedAmount(amount_grams));
    }

    fn render_schedules(&self, schedules: &[Schedule]) {
        self.push(Rendered::Schedules(schedules.to_vec()));
    }

    fn remove_schedule(&self, id: &ScheduleId) {
        self.push(Rendered::Removed(id.clone()));
    }

    fn show_notice(&self, notice: &Notice) {
        self.push(Rendered::Notice(notice.kind, notice.text.clone()));
    }

    fn clear_notice(&self) {
        self.push(Rendered::ClearNotice);
    }

    async fn confirm(&self, _question: &str) -> bool {
        *self.confirm_answer.lock().unwrap()
    }
}

// ── Clock ──────────────────────────────────────────────────────────

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let delta = TimeDelta::from_std(by).unwrap();
        *self.now.lock().unwrap() += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}
