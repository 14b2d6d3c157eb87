//! Error types for the Anytype API client.
//!
//! # Design
//! Every HTTP status the API documents gets its own variant so callers can
//! match on exactly the failures they care about. All status variants carry
//! the same `ErrorDetails`, which keeps blanket handling (`status()`,
//! `code()`, `message()`) uniform. Transport failures are separate variants
//! because they never produced a status code.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

const DEFAULT_MESSAGE: &str = "Unknown error";
const DEFAULT_CODE: &str = "unknown_error";

/// What the server said about a failed request.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    pub message: String,
    pub status: u16,
    pub code: String,
    /// Raw JSON error body; `Value::Null` when the body was not JSON.
    pub payload: Value,
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 400. The request was rejected by server-side validation.
    #[error("{0}")]
    Validation(ErrorDetails),

    /// 401. Missing or invalid API key.
    #[error("{0}")]
    Unauthorized(ErrorDetails),

    /// 403.
    #[error("{0}")]
    Forbidden(ErrorDetails),

    /// 404.
    #[error("{0}")]
    NotFound(ErrorDetails),

    /// 410. The resource existed but was removed.
    #[error("{0}")]
    Gone(ErrorDetails),

    /// 429.
    #[error("{0}")]
    RateLimited(ErrorDetails),

    /// Any other status >= 400.
    #[error("{0}")]
    Api(ErrorDetails),

    /// The request did not complete within the configured timeout.
    #[error("Request timeout")]
    Timeout,

    /// The request never produced an HTTP response.
    #[error("HTTP error: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A query string handed to the simple facade could not be parsed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl ApiError {
    /// Classify a failed response by status code.
    ///
    /// `message` and `code` come from the JSON body when present, otherwise
    /// they fall back to `"Unknown error"` and `"unknown_error"`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let payload: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let field = |name: &str, default: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or(default)
                .to_string()
        };
        let details = ErrorDetails {
            message: field("message", DEFAULT_MESSAGE),
            status,
            code: field("code", DEFAULT_CODE),
            payload: payload.clone(),
        };

        match status {
            400 => ApiError::Validation(details),
            401 => ApiError::Unauthorized(details),
            403 => ApiError::Forbidden(details),
            404 => ApiError::NotFound(details),
            410 => ApiError::Gone(details),
            429 => ApiError::RateLimited(details),
            _ => ApiError::Api(details),
        }
    }

    /// Server-provided details, if this error came from an HTTP response.
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            ApiError::Validation(d)
            | ApiError::Unauthorized(d)
            | ApiError::Forbidden(d)
            | ApiError::NotFound(d)
            | ApiError::Gone(d)
            | ApiError::RateLimited(d)
            | ApiError::Api(d) => Some(d),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.details().map(|d| d.status)
    }

    pub fn code(&self) -> Option<&str> {
        self.details().map(|d| d.code.as_str())
    }

    pub fn message(&self) -> String {
        match self.details() {
            Some(d) => d.message.clone(),
            None => self.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Deserialization(e.to_string())
    }
}
