//! Test error types.

use thiserror::Error;

/// Errors raised by the test client.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be built (bad URI or header).
    #[error("request build error: {0}")]
    RequestBuild(String),

    /// The response body could not be read or is not UTF-8.
    #[error("body read error: {0}")]
    BodyRead(String),

    /// The response body is not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TestError::RequestBuild("invalid URI".to_string()).to_string(),
            "request build error: invalid URI"
        );
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(TestError::from(json).to_string().starts_with("JSON error: "));
    }
}
