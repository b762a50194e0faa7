//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `pawfeed.toml` in the working directory (or the path in
//! `PAWFEED_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::time::Duration;

use pawfeed_adapter_http_reqwest::HttpConfig;
use pawfeed_domain::feeding::FeedPolicy;
use pawfeed_domain::settings::{DEFAULT_FEED_AMOUNT_GRAMS, DEFAULT_MIN_FOOD_LEVEL_KG, Settings};
use serde::Deserialize;

const DEFAULT_PATH: &str = "pawfeed.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feeder backend location.
    pub backend: HttpConfig,
    /// Initial feeding settings.
    pub feeding: FeedingConfig,
    /// Controller delays and cooldowns.
    pub timing: TimingConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Settings used until the user saves new ones.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FeedingConfig {
    /// Portion dispensed by auto and default manual feeds, in grams.
    pub default_feed_amount: f64,
    /// Bowl weight below which auto feeding kicks in, in kg.
    pub min_food_level: f64,
}

/// Controller timings, in milliseconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub poll_interval_ms: u64,
    pub mode_settle_ms: u64,
    pub feed_reenable_ms: u64,
    pub manual_cooldown_ms: u64,
    pub auto_cooldown_ms: u64,
    pub failure_rollback_ms: u64,
    pub notice_ttl_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `pawfeed.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PAWFEED_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PAWFEED_BACKEND_URL") {
            self.backend.base_url = val;
        }
        if let Ok(val) = std::env::var("PAWFEED_DEFAULT_FEED_AMOUNT")
            && let Ok(amount) = val.parse()
        {
            self.feeding.default_feed_amount = amount;
        }
        if let Ok(val) = std::env::var("PAWFEED_MIN_FOOD_LEVEL")
            && let Ok(level) = val.parse()
        {
            self.feeding.min_food_level = level;
        }
        if let Ok(val) = std::env::var("PAWFEED_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "backend base_url must not be empty".to_string(),
            ));
        }
        if self.timing.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_ms must be non-zero".to_string(),
            ));
        }
        if !self.feeding.default_feed_amount.is_finite() || self.feeding.default_feed_amount <= 0.0
        {
            return Err(ConfigError::Validation(
                "default_feed_amount must be greater than zero".to_string(),
            ));
        }
        if !self.feeding.min_food_level.is_finite() {
            return Err(ConfigError::Validation(
                "min_food_level must be a number".to_string(),
            ));
        }
        Ok(())
    }

    /// Controller policy built from the timing section.
    #[must_use]
    pub fn policy(&self) -> FeedPolicy {
        let t = &self.timing;
        FeedPolicy {
            poll_interval: Duration::from_millis(t.poll_interval_ms),
            mode_settle: Duration::from_millis(t.mode_settle_ms),
            feed_reenable: Duration::from_millis(t.feed_reenable_ms),
            manual_cooldown: Duration::from_millis(t.manual_cooldown_ms),
            auto_cooldown: Duration::from_millis(t.auto_cooldown_ms),
            failure_rollback: Duration::from_millis(t.failure_rollback_ms),
            notice_ttl: Duration::from_millis(t.notice_ttl_ms),
            ..FeedPolicy::default()
        }
    }

    /// Initial settings built from the feeding section.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            default_feed_amount_grams: self.feeding.default_feed_amount,
            min_food_level_kg: self.feeding.min_food_level,
            auto_feed_enabled: false,
        }
    }
}

impl Default for FeedingConfig {
    fn default() -> Self {
        Self {
            default_feed_amount: DEFAULT_FEED_AMOUNT_GRAMS,
            min_food_level: DEFAULT_MIN_FOOD_LEVEL_KG,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 3_000,
            mode_settle_ms: 500,
            feed_reenable_ms: 1_000,
            manual_cooldown_ms: 5_000,
            auto_cooldown_ms: 10_000,
            failure_rollback_ms: 8_000,
            notice_ttl_ms: 5_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "pawfeed=info,pawfeed_app=info,pawfeed_adapter_http_reqwest=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
