//! HTTP-specific error type wrapping reqwest and decoding failures.

use pawfeed_domain::error::{FeederError, RejectedError};

/// Errors originating from the HTTP backend adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request could not be sent or the response could not be read.
    #[error("transport error")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("malformed response body")]
    Decode(#[from] serde_json::Error),

    /// The backend answered with an error status or a non-success body.
    #[error(transparent)]
    Rejected(#[from] RejectedError),
}

impl From<HttpError> for FeederError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Rejected(rejected) => Self::Rejected(rejected),
            other => Self::Network(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_rejection_to_rejected() {
        let err = HttpError::Rejected(RejectedError {
            status: Some(400),
            message: Some("invalid mode".to_string()),
        });

        match FeederError::from(err) {
            FeederError::Rejected(rejected) => {
                assert_eq!(rejected.status, Some(400));
                assert_eq!(rejected.message.as_deref(), Some("invalid mode"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn should_map_decode_failure_to_network() {
        let decode = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();

        let err = FeederError::from(HttpError::from(decode));

        assert!(matches!(err, FeederError::Network(_)));
        assert_eq!(err.user_message("fallback"), "fallback");
    }
}
