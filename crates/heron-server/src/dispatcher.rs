//! The per-request pipeline.
//!
//! ```text
//! Matching ──no route──────────────────────────────▶ 404
//!    │
//! Authenticating ──rejected───────────────────────▶ 401 (500 without a secret)
//!    │
//! Extracting ──malformed query or JSON────────────▶ 400
//!    │
//! CacheCheck ──hit────────────────────────────────▶ 200, X-Cache: HIT
//!    │
//! Invoking ──error or panic───────────────────────▶ handler category / 500
//!    │
//! Responding (store body if cacheable) ───────────▶ 200
//! ```
//!
//! Each request produces exactly one response value. The dispatcher holds no
//! per-request state, so one instance is shared by every connection.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::FutureExt;
use heron_auth::Authenticator;
use heron_cache::{CacheGate, CacheStatus};
use heron_core::{Arguments, ErrorCategory, HeronError, HeronResult, OperationRegistry, RequestContext};
use heron_extract::{resolve_bindings, ExtractedParams};
use heron_router::{RouteDefinition, RouteMatch, RouteTable};
use heron_telemetry::metrics::{record_cache_lookup, record_request, UNMATCHED_OPERATION};
use http::{Request, StatusCode};

use crate::response::{error_response, json_response, with_cache_headers, HttpResponse};

/// What a successfully handled request sends back.
#[derive(Debug)]
struct Reply {
    body: Bytes,
    cache: Option<(CacheStatus, u64)>,
}

/// Routes requests through authentication, caching and the operation.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use bytes::Bytes;
/// use heron_auth::{AuthPolicy, Authenticator};
/// use heron_cache::{CacheGate, InMemoryStore};
/// use heron_core::{HeronResult, OperationRegistry};
/// use heron_router::{HttpMethod, ParamBinding, PathPattern, RouteDefinition, RouteTable};
/// use heron_server::Dispatcher;
/// use serde_json::Value;
///
/// let mut routes = RouteTable::new();
/// routes.register(
///     RouteDefinition::new(HttpMethod::Get, PathPattern::parse("/users/:id").unwrap(), "users.get")
///         .bind(ParamBinding::WholeParams),
/// );
///
/// let mut operations = OperationRegistry::new();
/// operations.register("users.get", |(params,): (Value,)| async move {
///     HeronResult::Ok(params)
/// });
///
/// let dispatcher = Dispatcher::new(
///     routes,
///     operations,
///     Authenticator::jwt(AuthPolicy::new(None, false)),
///     CacheGate::new(Arc::new(InMemoryStore::new())),
/// );
///
/// let request = http::Request::get("/users/42").body(Bytes::new()).unwrap();
/// let response = tokio_test::block_on(dispatcher.dispatch(request));
/// assert_eq!(response.status(), 200);
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    operations: Arc<OperationRegistry>,
    authenticator: Authenticator,
    cache: CacheGate,
}

impl Dispatcher {
    /// Creates a dispatcher. The route table and registry are frozen from here on.
    pub fn new(
        routes: RouteTable,
        operations: OperationRegistry,
        authenticator: Authenticator,
        cache: CacheGate,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            operations: Arc::new(operations),
            authenticator,
            cache,
        }
    }

    /// Returns the route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Returns the operation registry.
    #[must_use]
    pub fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    /// Returns the authenticator.
    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Returns the cache gate.
    #[must_use]
    pub fn cache(&self) -> &CacheGate {
        &self.cache
    }

    /// Handles a request whose body has been collected.
    pub async fn dispatch(&self, request: Request<Bytes>) -> HttpResponse {
        let (parts, body) = request.into_parts();
        let ctx = RequestContext::new(
            parts.method,
            parts.uri.path(),
            parts.uri.query(),
            parts.headers,
            body,
        );
        self.dispatch_context(ctx).await
    }

    /// Handles a request already wrapped in a context.
    pub async fn dispatch_context(&self, mut ctx: RequestContext) -> HttpResponse {
        let request_id = ctx.request_id();

        let response = match self.run(&mut ctx).await {
            Ok(reply) => {
                let response = json_response(StatusCode::OK, reply.body, request_id);
                match reply.cache {
                    Some((status, ttl_secs)) => with_cache_headers(response, status, ttl_secs),
                    None => response,
                }
            }
            Err(error) => {
                log_failure(&ctx, &error);
                error_response(&error, request_id)
            }
        };

        let operation = ctx.operation_id().unwrap_or(UNMATCHED_OPERATION);
        let status = response.status().as_u16();
        let elapsed = ctx.elapsed();
        record_request(operation, status, elapsed);

        tracing::info!(
            request_id = %request_id,
            operation_id = operation,
            http.method = %ctx.method(),
            http.path = ctx.path(),
            http.status_code = status,
            duration_ms = elapsed.as_secs_f64() * 1000.0,
            "request completed"
        );

        response
    }

    async fn run(&self, ctx: &mut RequestContext) -> HeronResult<Reply> {
        let Some(RouteMatch { route, params }) = self.routes.find(ctx.method().as_str(), ctx.path())
        else {
            return Err(HeronError::not_found(format!("no route for {} {}", ctx.method(), ctx.path())));
        };
        ctx.set_operation_id(route.operation_id().as_str());
        ctx.set_path_params(params);

        if let Some(claims) = self.authenticator.authenticate(route, ctx.headers())? {
            ctx.set_auth_claims(claims);
        }

        let extracted = ExtractedParams::extract(ctx)?;
        let arguments = resolve_bindings(route.bindings(), &extracted, ctx.auth_claims())?;

        let ttl_secs = route.cache_policy().map(|policy| policy.ttl_secs);
        if ttl_secs.is_some() {
            let hit = self.cache.lookup(route, ctx.path(), ctx.path_params()).await;
            record_cache_lookup(hit.is_some());
            if let Some(cached) = hit {
                return Ok(Reply {
                    body: cached.body,
                    cache: Some((CacheStatus::Hit, cached.ttl_secs)),
                });
            }
        }

        let body = self.invoke(route, arguments).await?;

        if ttl_secs.is_some() {
            self.cache
                .store_response(route, ctx.path(), ctx.path_params(), &body)
                .await;
        }

        Ok(Reply {
            body,
            cache: ttl_secs.map(|ttl| (CacheStatus::Miss, ttl)),
        })
    }

    async fn invoke(&self, route: &RouteDefinition, arguments: Arguments) -> HeronResult<Bytes> {
        let operation_id = route.operation_id().as_str();
        let operation = self
            .operations
            .get(operation_id)
            .ok_or_else(|| HeronError::internal(format!("no operation registered for '{operation_id}'")))?;

        if operation.arity() != arguments.len() {
            return Err(HeronError::internal(format!(
                "operation '{operation_id}' takes {} arguments but the route binds {}",
                operation.arity(),
                arguments.len()
            )));
        }

        match AssertUnwindSafe(operation.invoke(arguments)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(HeronError::internal(format!(
                "operation '{operation_id}' panicked: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}

fn log_failure(ctx: &RequestContext, error: &HeronError) {
    let request_id = ctx.request_id();
    let operation = ctx.operation_id().unwrap_or(UNMATCHED_OPERATION);

    match error.category() {
        ErrorCategory::Internal => {
            let source = std::error::Error::source(error).map(ToString::to_string);
            tracing::error!(
                request_id = %request_id,
                operation_id = operation,
                error = %error,
                source = source.as_deref(),
                "request failed"
            );
        }
        ErrorCategory::Unauthorized | ErrorCategory::BadRequest => {
            tracing::warn!(request_id = %request_id, operation_id = operation, error = %error, "request rejected");
        }
        ErrorCategory::NotFound => {
            tracing::debug!(request_id = %request_id, http.path = ctx.path(), "no matching route");
        }
    }
}
