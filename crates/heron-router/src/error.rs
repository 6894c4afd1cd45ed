//! Route declaration errors.

use thiserror::Error;

/// Errors raised while declaring routes.
///
/// These are startup-time errors: a route table that builds successfully
/// never produces them during request handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The method is not one of GET, POST, PUT, PATCH, DELETE.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A capture segment has no name (a bare `:`).
    #[error("empty capture name in path pattern '{pattern}'")]
    EmptyCapture {
        /// The offending pattern.
        pattern: String,
    },

    /// The same capture name appears twice in one pattern.
    #[error("duplicate capture ':{name}' in path pattern '{pattern}'")]
    DuplicateCapture {
        /// The repeated capture name.
        name: String,
        /// The offending pattern.
        pattern: String,
    },
}
