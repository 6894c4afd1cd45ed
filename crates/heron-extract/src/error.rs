//! Extraction error types.

use std::fmt;

use heron_core::HeronError;
use http::StatusCode;
use thiserror::Error;

/// Where a value was being extracted from when extraction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Query string parameters
    Query,
    /// Request body
    Body,
    /// Verified token claims
    Claims,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::Claims => write!(f, "claims"),
        }
    }
}

/// Error that occurs while extracting request data or resolving bindings.
///
/// # Example
///
/// ```rust
/// use heron_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::InvalidJson("expected value at line 1 column 1".into());
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Body);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The query string could not be decoded.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// The body was declared as JSON but did not parse.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// An auth binding was resolved before authentication produced claims.
    #[error("auth binding at position {position} resolved without verified claims")]
    MissingClaims {
        /// Position of the binding in the route's binding list.
        position: usize,
    },
}

impl ExtractionError {
    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        match self {
            Self::InvalidQuery(_) => ExtractionSource::Query,
            Self::InvalidJson(_) => ExtractionSource::Body,
            Self::MissingClaims { .. } => ExtractionSource::Claims,
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Malformed client input is a 400; missing claims mean the pipeline ran
    /// out of order, which is a 500.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidQuery(_) | Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::MissingClaims { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExtractionError> for HeronError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::InvalidQuery(_) | ExtractionError::InvalidJson(_) => {
                Self::bad_request(err.to_string())
            }
            ExtractionError::MissingClaims { .. } => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heron_core::ErrorCategory;

    #[test]
    fn test_invalid_json_is_bad_request() {
        let err = ExtractionError::InvalidJson("trailing characters".into());
        assert_eq!(err.extraction_source(), ExtractionSource::Body);

        let heron: HeronError = err.into();
        assert_eq!(heron.category(), ErrorCategory::BadRequest);
        assert_eq!(
            heron.public_message(),
            "Bad Request: invalid JSON body: trailing characters"
        );
    }

    #[test]
    fn test_missing_claims_is_internal() {
        let err = ExtractionError::MissingClaims { position: 1 };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let heron: HeronError = err.into();
        assert_eq!(heron.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_extraction_source_display() {
        assert_eq!(ExtractionSource::Query.to_string(), "query");
        assert_eq!(ExtractionSource::Body.to_string(), "body");
        assert_eq!(ExtractionSource::Claims.to_string(), "claims");
    }
}
