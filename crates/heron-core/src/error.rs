//! Error types for Heron.
//!
//! [`HeronError`] is the error every request-level failure is folded into
//! before a response is written. Each variant belongs to one
//! [`ErrorCategory`], and the category alone decides the status code and the
//! message clients see. Details of internal failures are kept for logging and
//! never serialized into a response.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`HeronError`].
pub type HeronResult<T> = Result<T, HeronError>;

/// Categories of request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The request itself is malformed (body, query or argument shape).
    BadRequest,
    /// Missing, malformed or invalid bearer token.
    Unauthorized,
    /// No route matched the method and path.
    NotFound,
    /// Anything else: handler failures, missing secret, broken wiring.
    Internal,
}

impl ErrorCategory {
    /// Returns the HTTP status code for this category.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the snake_case name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

/// Standard error type for Heron.
///
/// # Example
///
/// ```
/// use heron_core::{ErrorCategory, HeronError};
///
/// let err = HeronError::bad_request("invalid JSON body");
/// assert_eq!(err.category(), ErrorCategory::BadRequest);
/// assert_eq!(err.status_code().as_u16(), 400);
/// assert_eq!(err.public_message(), "Bad Request: invalid JSON body");
///
/// let err = HeronError::internal("database exploded");
/// assert_eq!(err.public_message(), "Internal Server Error");
/// ```
#[derive(Error, Debug)]
pub enum HeronError {
    /// The request could not be decoded.
    #[error("Bad request: {message}")]
    BadRequest {
        /// What was wrong with the request. Returned to the client.
        message: String,
    },

    /// Authentication failed.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Why authentication failed. Logged only.
        message: String,
    },

    /// No route matched.
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found. Logged only.
        message: String,
    },

    /// Internal failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message. Logged only.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl HeronError {
    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::BadRequest { .. } => ErrorCategory::BadRequest,
            Self::Unauthorized { .. } => ErrorCategory::Unauthorized,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().status_code()
    }

    /// Returns the message placed in the response body.
    ///
    /// Only bad requests carry their detail to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest { message } => format!("Bad Request: {message}"),
            Self::Unauthorized { .. } => "Unauthorized".to_string(),
            Self::NotFound { .. } => "Not Found".to_string(),
            Self::Internal { .. } => "Internal Server Error".to_string(),
        }
    }

    /// Returns the JSON response body, `{"error": "<public message>"}`.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.public_message(),
        }
    }
}

impl From<anyhow::Error> for HeronError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// The JSON error body written for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Client-facing message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_map_to_status_codes() {
        assert_eq!(HeronError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(HeronError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(HeronError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            HeronError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_messages_hide_details() {
        assert_eq!(HeronError::unauthorized("bad signature").public_message(), "Unauthorized");
        assert_eq!(HeronError::not_found("GET /x").public_message(), "Not Found");
        assert_eq!(
            HeronError::internal_with_source("boom", anyhow::anyhow!("cause")).public_message(),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_error_body_serialization() {
        let body = serde_json::to_string(&HeronError::unauthorized("no header").to_body()).unwrap();
        assert_eq!(body, r#"{"error":"Unauthorized"}"#);
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let err: HeronError = anyhow::anyhow!("disk full").into();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ErrorCategory::BadRequest).unwrap();
        assert_eq!(json, "\"bad_request\"");
        assert_eq!(ErrorCategory::NotFound.as_str(), "not_found");
    }
}
