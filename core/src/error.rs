//! Error types for the Tremendous client.
//!
//! # Design
//! `Api` and `Decode` are kept apart so callers can tell "the server rejected
//! the request" from "the server answered with something we could not read."
//! An error response body is never decoded into a record; it is carried
//! verbatim in `ErrorPayload`.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the dispatch core and every resource facade.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with a status outside 2xx.
    #[error("API returned HTTP {status}: {payload}")]
    Api { status: u16, payload: ErrorPayload },

    /// The response body did not have the expected shape: not JSON, missing
    /// envelope key, missing required field, or a field of the wrong type.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request parameters could not be encoded.
    #[error("failed to serialize request: {0}")]
    Serialization(String),

    /// The transport could not complete the round trip.
    #[error("transport error: {0}")]
    Transport(String),

    /// Client configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status of an `Api` error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The server-provided error body of an `Api` error.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Error::Api { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// The body parsed as JSON.
    Json(serde_json::Value),
    /// The body was not JSON; kept as raw text (possibly empty).
    Text(String),
}

impl ErrorPayload {
    pub(crate) fn from_body(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(value) => ErrorPayload::Json(value),
            Err(_) => ErrorPayload::Text(body.to_string()),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ErrorPayload::Json(value) => Some(value),
            ErrorPayload::Text(_) => None,
        }
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPayload::Json(value) => write!(f, "{value}"),
            ErrorPayload::Text(text) if text.is_empty() => write!(f, "<empty body>"),
            ErrorPayload::Text(text) => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_body_is_kept_as_json() {
        let payload = ErrorPayload::from_body(r#"{"error":"not_found"}"#);
        assert_eq!(payload, ErrorPayload::Json(json!({"error": "not_found"})));
    }

    #[test]
    fn non_json_body_is_kept_as_text() {
        let payload = ErrorPayload::from_body("<html>Bad Gateway</html>");
        assert_eq!(payload, ErrorPayload::Text("<html>Bad Gateway</html>".to_string()));
        assert!(payload.as_json().is_none());
    }

    #[test]
    fn api_error_display_includes_status_and_payload() {
        let err = Error::Api {
            status: 422,
            payload: ErrorPayload::Json(json!({"errors": {"message": "invalid"}})),
        };
        let text = err.to_string();
        assert!(text.contains("422"));
        assert!(text.contains("invalid"));
    }

    #[test]
    fn not_found_helper_only_matches_404() {
        let not_found = Error::Api {
            status: 404,
            payload: ErrorPayload::Text(String::new()),
        };
        assert!(not_found.is_not_found());
        assert!(!Error::Decode("x".into()).is_not_found());
        assert_eq!(not_found.payload().unwrap().to_string(), "<empty body>");
    }
}
