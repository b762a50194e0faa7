//! [`FeederBackend`] implementation over the feeder's JSON API.

use pawfeed_app::ports::{Ack, FeederBackend, ModeAck};
use pawfeed_domain::error::{FeederError, RejectedError};
use pawfeed_domain::mode::FeedMode;
use pawfeed_domain::schedule::{NewSchedule, ScheduleId};
use pawfeed_domain::settings::Settings;
use pawfeed_domain::snapshot::SensorSnapshot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::HttpConfig;
use crate::error::HttpError;

const SUCCESS: &str = "success";

/// Common envelope of command responses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    status: Option<String>,
    message: Option<String>,
    current_mode: Option<FeedMode>,
}

#[derive(Serialize)]
struct FeedRequest {
    amount: f64,
}

#[derive(Serialize)]
struct ModeRequest {
    mode: FeedMode,
}

/// REST client for the feeder backend.
#[derive(Debug, Clone)]
pub struct RestBackend {
    base_url: String,
    client: reqwest::Client,
}

impl RestBackend {
    /// Build a backend for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(config, client))
    }

    /// Build a backend around an existing client.
    pub fn with_client(config: &HttpConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Read a response, turning non-2xx codes into rejections.
    async fn read<T: DeserializeOwned + Default>(
        response: reqwest::Response,
    ) -> Result<T, HttpError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope>(&body)
                .ok()
                .and_then(|envelope| envelope.message);
            return Err(RejectedError {
                status: Some(status.as_u16()),
                message,
            }
            .into());
        }

        if body.is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn command(&self, request: reqwest::RequestBuilder) -> Result<Envelope, HttpError> {
        let response = request.send().await?;
        let envelope: Envelope = Self::read(response).await?;

        if envelope.status.as_deref() != Some(SUCCESS) {
            return Err(RejectedError {
                status: None,
                message: envelope.message,
            }
            .into());
        }
        Ok(envelope)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Envelope, HttpError> {
        self.command(self.client.post(self.url(path)).json(body))
            .await
    }
}

impl FeederBackend for RestBackend {
    async fn fetch_snapshot(&self) -> Result<SensorSnapshot, FeederError> {
        let response = self
            .client
            .get(self.url("/api/sensor_data"))
            .send()
            .await
            .map_err(HttpError::from)?;
        let snapshot: SensorSnapshot = Self::read(response).await?;
        tracing::trace!(?snapshot, "sensor snapshot fetched");
        Ok(snapshot)
    }

    async fn feed(&self, amount_grams: f64) -> Result<Ack, FeederError> {
        let envelope = self
            .post(
                "/api/feed",
                &FeedRequest {
                    amount: amount_grams,
                },
            )
            .await?;
        Ok(Ack {
            message: envelope.message,
        })
    }

    async fn set_mode(&self, mode: FeedMode) -> Result<ModeAck, FeederError> {
        let envelope = self.post("/api/mode", &ModeRequest { mode }).await?;
        let current_mode = envelope.current_mode.unwrap_or_else(|| {
            tracing::debug!(%mode, "backend did not echo the mode, assuming requested one");
            mode
        });
        Ok(ModeAck {
            current_mode,
            message: envelope.message,
        })
    }

    async fn save_settings(&self, settings: Settings) -> Result<Ack, FeederError> {
        let envelope = self.post("/api/settings", &settings).await?;
        Ok(Ack {
            message: envelope.message,
        })
    }

    async fn add_schedule(&self, schedule: NewSchedule) -> Result<Ack, FeederError> {
        let envelope = self.post("/api/schedule", &schedule).await?;
        Ok(Ack {
            message: envelope.message,
        })
    }

    async fn delete_schedule(&self, id: ScheduleId) -> Result<Ack, FeederError> {
        let request = self
            .client
            .delete(self.url(&format!("/api/schedule/{id}")));
        let envelope = self.command(request).await?;
        Ok(Ack {
            message: envelope.message,
        })
    }
}
