//! Error types for the Gemini client library.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// The main error type for all Gemini client operations.
#[derive(Error, Debug)]
pub enum GeminiError {
    /// Invalid caller-supplied input (malformed configuration, bad header or
    /// proxy values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    /// The exchange answered with a non-200 status
    #[error("HTTP error {status}: {body}")]
    Status {
        /// Response status code
        status: reqwest::StatusCode,
        /// Response body, kept as diagnostic detail
        body: String,
    },

    /// Deadline exhausted while waiting for a rate-limit token
    #[error("rate limit wait exceeded {waited:?}")]
    RateLimit {
        /// How long the caller waited before giving up
        waited: Duration,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Gemini API reported an application-level error inside the response body
    #[error("Gemini API error: {0}")]
    Api(ApiError),

    /// Missing required credentials
    #[error("missing credentials: API key and secret required for private endpoints")]
    MissingCredentials,

    /// The requested exchange is not registered
    #[error("exchange '{0}' not supported")]
    UnsupportedExchange(String),
}

/// An application-level error reported by the Gemini API.
///
/// Gemini signals failures in the response body as
/// `{"result": "error", "reason": ..., "message": ...}`, independent of the
/// HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Short machine-readable reason (e.g. "InvalidSignature")
    pub reason: String,
    /// Human-readable message
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.reason, self.message)
    }
}

impl ApiError {
    /// Create a new API error from reason and message.
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            message: message.into(),
        }
    }

    /// Probe a response body for the Gemini error envelope.
    ///
    /// Returns `Some` only when the body parses as an object whose `result`
    /// field equals `"error"`. Any other body shape (arrays, success objects,
    /// non-JSON) yields `None`.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let envelope: ErrorEnvelope = serde_json::from_slice(body).ok()?;
        if envelope.result == "error" {
            Some(Self {
                reason: envelope.reason,
                message: envelope.message,
            })
        } else {
            None
        }
    }
}

/// Wire shape of the Gemini error envelope.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    result: String,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_body() {
        let body =
            br#"{"result":"error","reason":"InvalidNonce","message":"Nonce was not greater"}"#;
        let error = ApiError::from_body(body).unwrap();
        assert_eq!(error.reason, "InvalidNonce");
        assert_eq!(error.message, "Nonce was not greater");
    }

    #[test]
    fn test_api_error_ignores_success_bodies() {
        assert!(ApiError::from_body(br#"["btcusd","ethusd"]"#).is_none());
        assert!(ApiError::from_body(br#"{"symbol":"btcusd","open":"9121.76"}"#).is_none());
        assert!(ApiError::from_body(br#"{"result":"ok"}"#).is_none());
        assert!(ApiError::from_body(b"not json").is_none());
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new("InsufficientFunds", "Not enough USD");
        assert_eq!(error.to_string(), "InsufficientFunds - Not enough USD");
    }

    #[test]
    fn test_errors_preserve_cause() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = GeminiError::from(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
