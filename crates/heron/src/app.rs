//! Application assembly.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use heron_auth::{Authenticator, TokenVerifier};
use heron_cache::{CacheGate, CacheStore, InMemoryStore};
use heron_config::{CacheBackend, CacheConfig, ConfigLoader, HeronConfig};
use heron_core::{FromArguments, HeronResult, OperationRegistry};
use heron_router::{RouteDefinition, RouteTable};
use heron_server::{build_runtime, Dispatcher, Server};
use heron_telemetry::{init_telemetry, TelemetryConfig};
use serde::Serialize;

use crate::controller::{Controller, Routes};
use crate::error::AppError;

/// Configuration file read by [`App::from_env`] when present.
pub const DEFAULT_CONFIG_FILE: &str = "heron.toml";

/// Environment prefix read by [`App::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "HERON";

/// Collects controllers, configuration and collaborators, then builds the
/// [`Dispatcher`] or runs the server.
///
/// Building checks every route against the registered operations: a route
/// whose operation is missing, or whose binding count differs from the
/// handler's argument count, fails the build instead of failing requests.
///
/// # Example
///
/// ```rust
/// use heron::App;
/// use heron::core::HeronResult;
/// use serde_json::{json, Value};
///
/// # tokio_test::block_on(async {
/// let dispatcher = App::new()
///     .routes(|routes| {
///         routes
///             .get("/users/:id", "users.get")
///             .params()
///             .handler(|(params,): (Value,)| async move {
///                 HeronResult::Ok(json!({ "id": params["id"] }))
///             });
///     })
///     .build()
///     .await
///     .unwrap();
///
/// assert_eq!(dispatcher.routes().len(), 1);
/// # });
/// ```
#[must_use]
#[derive(Default)]
pub struct App {
    config: HeronConfig,
    routes: Routes,
    store: Option<Arc<dyn CacheStore>>,
    verifier: Option<Arc<dyn TokenVerifier>>,
}

impl App {
    /// Creates an application with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an application with `config`.
    pub fn with_config(config: HeronConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Loads configuration from `heron.toml` (if present), `.env` and
    /// `HERON__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if any layer fails to parse or the result
    /// does not validate.
    pub fn from_env() -> Result<Self, AppError> {
        let config = ConfigLoader::new()
            .with_defaults()
            .with_optional_file(DEFAULT_CONFIG_FILE)?
            .with_dotenv()?
            .with_env_prefix(DEFAULT_ENV_PREFIX)
            .load()?;
        Ok(Self::with_config(config))
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HeronConfig {
        &self.config
    }

    /// Adds a controller's routes.
    pub fn controller<C: Controller>(mut self, controller: C) -> Self {
        self.routes.controller(&controller);
        self
    }

    /// Declares routes inline.
    pub fn routes(mut self, declare: impl FnOnce(&mut Routes)) -> Self {
        declare(&mut self.routes);
        self
    }

    /// Registers a handler for routes declared with
    /// [`RouteBuilder::declare`](crate::RouteBuilder::declare).
    pub fn operation<Args, Res, F, Fut>(mut self, operation_id: impl Into<String>, handler: F) -> Self
    where
        Args: FromArguments + Send + 'static,
        Res: Serialize + Send + 'static,
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HeronResult<Res>> + Send + 'static,
    {
        self.routes.operation(operation_id, handler);
        self
    }

    /// Uses `store` instead of the store named by `cache.backend`.
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses `verifier` instead of the JWT verifier built from `auth.algorithms`.
    pub fn token_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Validates everything and builds the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns the first declaration error, a route/operation mismatch, an
    /// invalid configuration, or a cache store that cannot be opened.
    pub async fn build(self) -> Result<Dispatcher, AppError> {
        self.config.validate()?;

        let (definitions, operations, errors) = self.routes.into_parts();
        if let Some(error) = errors.into_iter().next() {
            return Err(error);
        }

        let mut table = RouteTable::new();
        for route in definitions {
            check_route(&route, &operations)?;
            if route.requires_auth() && route.cache_policy().is_some() {
                tracing::warn!(
                    route = %route,
                    "cached route reads token claims; the cache key does not include the caller"
                );
            }
            table.register(route);
        }

        let verifier = match self.verifier {
            Some(verifier) => verifier,
            None => Arc::new(self.config.verifier()?),
        };
        let authenticator = Authenticator::new(verifier, self.config.auth.policy());

        let store = match self.store {
            Some(store) => store,
            None => open_store(&self.config.cache).await?,
        };

        Ok(Dispatcher::new(table, operations, authenticator, CacheGate::new(store)))
    }

    /// Builds the dispatcher and wraps it in a server configured from the
    /// `server` and `telemetry` sections.
    ///
    /// # Errors
    ///
    /// Returns any error from [`build`](Self::build).
    pub async fn into_server(self) -> Result<Server, AppError> {
        let server_config = self.config.server.clone();
        let service_name = self.config.telemetry.service_name.clone();
        let dispatcher = self.build().await?;

        Ok(Server::builder()
            .http_addr(server_config.http_addr)
            .shutdown_timeout(Duration::from_secs(server_config.shutdown_timeout_secs))
            .health_endpoint(server_config.health_endpoint)
            .service_name(service_name)
            .build(dispatcher))
    }

    /// Serves on the current runtime until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the application does not build or the listener
    /// cannot be bound.
    pub async fn serve(self) -> Result<(), AppError> {
        self.into_server().await?.run().await?;
        Ok(())
    }

    /// Initializes telemetry, starts a runtime with `server.workers` threads
    /// and serves until SIGTERM or SIGINT.
    ///
    /// This is the entry point for a worker process; call it from `main`
    /// rather than from inside an existing runtime.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if telemetry, the runtime or the server fail to
    /// start.
    pub fn run(self) -> Result<(), AppError> {
        init_telemetry(&TelemetryConfig::from(&self.config.telemetry))?;
        let runtime = build_runtime(self.config.server.workers)?;
        runtime.block_on(self.serve())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("routes", &self.routes.definitions().len())
            .field("custom_store", &self.store.is_some())
            .field("custom_verifier", &self.verifier.is_some())
            .finish()
    }
}

fn check_route(route: &RouteDefinition, operations: &OperationRegistry) -> Result<(), AppError> {
    let operation = route.operation_id().as_str();
    let Some(arity) = operations.arity(operation) else {
        return Err(AppError::MissingOperation {
            route: route.to_string(),
            operation: operation.to_string(),
        });
    };

    if arity == route.bindings().len() {
        Ok(())
    } else {
        Err(AppError::ArityMismatch {
            route: route.to_string(),
            bindings: route.bindings().len(),
            arity,
        })
    }
}

async fn open_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>, AppError> {
    match config.backend {
        CacheBackend::Memory => Ok(Arc::new(InMemoryStore::new())),
        #[cfg(feature = "redis")]
        CacheBackend::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            Ok(Arc::new(heron_cache::RedisStore::connect(url).await?))
        }
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis => Err(AppError::RedisDisabled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heron_config::AuthConfig;
    use heron_router::ParamBinding;
    use serde_json::Value;

    async fn one((value,): (Value,)) -> HeronResult<Value> {
        Ok(value)
    }

    #[tokio::test]
    async fn test_build_registers_routes_in_order() {
        let dispatcher = App::new()
            .routes(|routes| {
                routes.get("/a/:x", "a.x").params().handler(one);
                routes.get("/a/b", "a.b").query().handler(one);
            })
            .build()
            .await
            .unwrap();

        let ids: Vec<_> = dispatcher
            .routes()
            .iter()
            .map(|r| r.operation_id().as_str())
            .collect();
        assert_eq!(ids, ["a.x", "a.b"]);
    }

    #[tokio::test]
    async fn test_missing_operation_fails_build() {
        let err = App::new()
            .routes(|routes| routes.get("/orphan", "nobody").declare())
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingOperation { operation, .. } if operation == "nobody"));
    }

    #[tokio::test]
    async fn test_arity_mismatch_fails_build() {
        let err = App::new()
            .routes(|routes| {
                routes
                    .post("/orders", "orders.create")
                    .body()
                    .claim("sub")
                    .handler(one);
            })
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ArityMismatch { bindings: 2, arity: 1, .. }));
    }

    #[tokio::test]
    async fn test_declared_route_uses_separate_operation() {
        let dispatcher = App::new()
            .routes(|routes| {
                routes.get("/one", "shared").bind(ParamBinding::WholeQuery).declare();
                routes.get("/two", "shared").bind(ParamBinding::WholeQuery).declare();
            })
            .operation("shared", one)
            .build()
            .await
            .unwrap();
        assert_eq!(dispatcher.routes().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_build() {
        let config = HeronConfig {
            auth: AuthConfig {
                algorithms: vec!["ROT13".to_string()],
                ..AuthConfig::default()
            },
            ..HeronConfig::default()
        };
        let err = App::with_config(config).build().await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[cfg(not(feature = "redis"))]
    #[tokio::test]
    async fn test_redis_backend_needs_feature() {
        let mut config = HeronConfig::default();
        config.cache.backend = CacheBackend::Redis;
        config.cache.redis_url = Some("redis://127.0.0.1:6379".to_string());
        let err = App::with_config(config).build().await.unwrap_err();
        assert!(matches!(err, AppError::RedisDisabled));
    }

    #[tokio::test]
    async fn test_into_server_uses_config() {
        let mut config = HeronConfig::default();
        config.server.http_addr = "127.0.0.1:0".to_string();
        config.server.shutdown_timeout_secs = 5;
        config.server.health_endpoint = false;

        let server = App::with_config(config).into_server().await.unwrap();
        assert_eq!(server.http_addr(), "127.0.0.1:0");
        assert_eq!(server.shutdown_timeout(), Duration::from_secs(5));
        assert!(server.health().is_none());
    }
}
