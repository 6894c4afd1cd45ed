//! The HTTP server shell.
//!
//! Accepts TCP connections, serves HTTP/1.1 on each with Hyper, collects the
//! request body and hands the request to the shared [`Dispatcher`]. On
//! shutdown it stops accepting, asks open connections to finish their current
//! request, and waits up to the drain timeout.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use heron_core::{HeronError, RequestId};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;

use crate::dispatcher::Dispatcher;
use crate::error::ServerError;
use crate::health::{HealthCheck, HEALTH_PATH};
use crate::response::{error_response, json_response, HttpResponse};
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// A configured server, ready to run.
///
/// # Example
///
/// ```rust,no_run
/// # use heron_server::{Dispatcher, Server};
/// # async fn run(dispatcher: Dispatcher) -> Result<(), heron_server::ServerError> {
/// Server::builder()
///     .http_addr("127.0.0.1:8080")
///     .service_name("users")
///     .build(dispatcher)
///     .run()
///     .await
/// # }
/// ```
#[derive(Debug)]
pub struct Server {
    dispatcher: Arc<Dispatcher>,
    http_addr: String,
    shutdown_timeout: Duration,
    health: Option<HealthCheck>,
}

impl Server {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns the configured listen address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Returns the drain timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Returns the health reporter, if the endpoint is enabled.
    #[must_use]
    pub fn health(&self) -> Option<&HealthCheck> {
        self.health.as_ref()
    }

    /// Binds and serves until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if the address is invalid or cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds and serves until `shutdown` triggers.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr: SocketAddr = self.http_addr.parse().map_err(|source| ServerError::InvalidAddress {
            addr: self.http_addr.clone(),
            source,
        })?;

        let listener = TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

        self.serve(listener, shutdown).await;
        Ok(())
    }

    /// Serves on an already bound listener until `shutdown` triggers.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) {
        self.log_startup(&listener);

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            if let Err(error) = server.handle_connection(stream, shutdown).await {
                                tracing::debug!(%remote_addr, %error, "connection closed with error");
                            }
                            drop(token);
                        });
                    }
                    Err(error) => tracing::error!(%error, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        tracing::info!(
            active_connections = tracker.active_connections(),
            timeout_secs = server.shutdown_timeout.as_secs(),
            "draining connections"
        );

        tokio::select! {
            () = tracker.wait_for_idle() => tracing::info!("all connections closed"),
            () = tokio::time::sleep(server.shutdown_timeout) => tracing::warn!(
                active_connections = tracker.active_connections(),
                "drain timeout reached, dropping remaining connections"
            ),
        }

        tracing::info!("server stopped");
    }

    fn log_startup(&self, listener: &TcpListener) {
        let addr = listener
            .local_addr()
            .map_or_else(|_| self.http_addr.clone(), |addr| addr.to_string());
        let routes = self.dispatcher.routes();

        tracing::info!(http.addr = %addr, routes = routes.len(), "server listening");
        for route in routes.iter() {
            tracing::debug!(route = %route, "route registered");
        }

        let policy = self.dispatcher.authenticator().policy();
        if policy.ignore_expiration {
            tracing::warn!("auth.ignore_expiration is set: expired bearer tokens are accepted");
        }
        if policy.secret.is_none() && routes.iter().any(|route| route.requires_auth()) {
            tracing::warn!("no auth secret configured: authenticated routes will answer 500");
        }
        if self.health.is_some() && routes.find(Method::GET.as_str(), HEALTH_PATH).is_some() {
            tracing::info!(path = HEALTH_PATH, "registered route replaces the built-in health check");
        }
    }

    /// The built-in health check answers only what no registered route does.
    fn builtin_health(&self, method: &Method, path: &str) -> Option<&HealthCheck> {
        let health = self.health.as_ref()?;
        let claimed = self.dispatcher.routes().find(method.as_str(), path).is_some();
        (*method == Method::GET && path == HEALTH_PATH && !claimed).then_some(health)
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |request: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(request).await) }
        });

        let connection = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(connection);

        tokio::select! {
            result = connection.as_mut() => result,
            () = shutdown.recv() => {
                connection.as_mut().graceful_shutdown();
                connection.await
            }
        }
    }

    async fn handle_request(&self, request: Request<Incoming>) -> HttpResponse {
        if let Some(health) = self.builtin_health(request.method(), request.uri().path()) {
            return health_response(health);
        }

        let (parts, body) = request.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(error) => {
                tracing::warn!(%error, "failed to read request body");
                return error_response(
                    &HeronError::bad_request("request body could not be read"),
                    RequestId::new(),
                );
            }
        };

        self.dispatcher.dispatch(Request::from_parts(parts, body)).await
    }
}

fn health_response(health: &HealthCheck) -> HttpResponse {
    let body = serde_json::to_vec(&health.status())
        .map_or_else(|_| Bytes::from_static(br#"{"status":"healthy"}"#), Bytes::from);
    json_response(StatusCode::OK, body, RequestId::new())
}

/// Builds the multi-threaded runtime the server runs on.
///
/// `workers == 0` keeps Tokio's default of one worker per core.
///
/// # Errors
///
/// Returns `ServerError::Runtime` if the runtime cannot be created.
pub fn build_runtime(workers: usize) -> Result<Runtime, ServerError> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all().thread_name("heron-worker");
    if workers > 0 {
        builder.worker_threads(workers);
    }
    builder.build().map_err(ServerError::Runtime)
}

/// Builder for [`Server`].
#[derive(Debug, Clone)]
pub struct ServerBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    health_endpoint: bool,
    service_name: String,
    service_version: String,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    /// Creates a builder listening on `0.0.0.0:8080` with a 30 s drain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            shutdown_timeout: Duration::from_secs(30),
            health_endpoint: true,
            service_name: "heron".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Sets the listen address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets how long open connections may drain after shutdown.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Enables or disables `GET /health`.
    #[must_use]
    pub fn health_endpoint(mut self, enabled: bool) -> Self {
        self.health_endpoint = enabled;
        self
    }

    /// Sets the service name reported by the health endpoint.
    #[must_use]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Sets the version reported by the health endpoint.
    #[must_use]
    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    /// Builds the server around `dispatcher`.
    #[must_use]
    pub fn build(self, dispatcher: Dispatcher) -> Server {
        Server {
            dispatcher: Arc::new(dispatcher),
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            health: self
                .health_endpoint
                .then(|| HealthCheck::new(self.service_name, self.service_version)),
        }
    }
}
