//! Error types for the Podcast Index client.
//!
//! # Design
//! Every request-path failure lands in `ClientError` and propagates straight
//! to the caller; nothing here is retried. Telemetry has its own
//! `TelemetryError` (see `telemetry.rs`) because those failures are
//! swallowed and never reach this enum.

use thiserror::Error;

/// Errors returned by request building, dispatch, and response parsing.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials are missing or empty. Raised at construction or when
    /// signing, always before any network attempt.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The API answered with a non-2xx status.
    #[error("API error: {status} {status_text}")]
    Api { status: u16, status_text: String },

    /// The HTTP round-trip itself failed (connect, reset, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx body did not match the expected response shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ClientError {
    /// HTTP status carried by an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_text() {
        let err = ClientError::Api {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 404 Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn configuration_error_has_no_status() {
        let err = ClientError::Configuration("missing key".to_string());
        assert!(err.status().is_none());
        assert!(err.to_string().contains("missing key"));
    }
}
