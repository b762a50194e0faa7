//! HTTP backend configuration.

use serde::Deserialize;

/// Where the feeder backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Base URL of the backend, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}
