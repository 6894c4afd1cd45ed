//! Application assembly errors.

use heron_cache::CacheError;
use heron_config::ConfigError;
use heron_router::RouteError;
use heron_server::ServerError;
use heron_telemetry::TelemetryError;
use thiserror::Error;

/// Errors raised while assembling or starting an [`App`](crate::App).
///
/// All of these happen before the first request is accepted.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration did not load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A declared path pattern is invalid.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Two handlers were registered under one operation id.
    #[error("operation '{0}' is registered twice")]
    DuplicateOperation(String),

    /// A route points at an operation nobody registered.
    #[error("route {route} targets unregistered operation '{operation}'")]
    MissingOperation {
        /// The route, rendered as `METHOD /path -> operation`.
        route: String,
        /// The missing operation id.
        operation: String,
    },

    /// A route declares a different number of bindings than its handler takes.
    #[error("route {route} declares {bindings} bindings but its operation takes {arity} arguments")]
    ArityMismatch {
        /// The route, rendered as `METHOD /path -> operation`.
        route: String,
        /// Declared binding count.
        bindings: usize,
        /// Handler argument count.
        arity: usize,
    },

    /// `cache.backend = "redis"` without the `redis` cargo feature.
    #[error("cache backend 'redis' requires the `redis` feature")]
    RedisDisabled,

    /// The cache store could not be opened.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Logging or metrics failed to initialize.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// The server failed to start.
    #[error(transparent)]
    Server(#[from] ServerError),
}
