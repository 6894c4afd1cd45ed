//! Cache store errors.

use thiserror::Error;

/// A failed cache store operation.
///
/// The cache gate never lets these reach a caller: a failed read is a miss
/// and a failed write is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The store could not be reached.
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with an error.
    #[error("cache store error: {0}")]
    Backend(String),
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Backend(err.to_string())
        }
    }
}
