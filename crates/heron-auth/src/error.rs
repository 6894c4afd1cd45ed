//! Authentication error types.

use heron_core::HeronError;
use thiserror::Error;

/// Why a request was rejected as unauthorized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No `Authorization` header was sent.
    #[error("missing Authorization header")]
    MissingHeader,

    /// The header was present but not a `Bearer ` credential.
    #[error("Authorization header is not a bearer token")]
    NotBearer,

    /// The token failed verification.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] VerifyError),
}

/// A token verification failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct VerifyError {
    message: String,
}

impl VerifyError {
    /// Creates a verification error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by the [`Authenticator`](crate::Authenticator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The caller did not present a valid bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] Rejection),

    /// The route needs authentication but no signing secret is configured.
    #[error("no signing secret configured")]
    MissingSecret,
}

impl From<AuthError> for HeronError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized(_) => Self::unauthorized(err.to_string()),
            AuthError::MissingSecret => Self::internal(err.to_string()),
        }
    }
}
