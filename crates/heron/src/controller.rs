//! Route declaration.
//!
//! Controllers declare their routes through a [`Routes`] builder instead of
//! annotations. Each declaration names the method, the path (joined onto the
//! controller's prefix), the operation id, the positional bindings and an
//! optional cache TTL, and usually registers the handler in the same call.

use std::future::Future;

use heron_core::{FromArguments, HeronResult, Operation, OperationRegistry};
use heron_router::{ClaimSelector, HttpMethod, ParamBinding, PathPattern, RouteDefinition};
use serde::Serialize;

use crate::error::AppError;

/// A group of routes sharing a path prefix.
///
/// Handlers are `'static`, so a controller clones whatever state they need
/// (usually an `Arc`) into each closure.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use heron::{Controller, Routes};
/// use heron::core::HeronResult;
/// use serde_json::{json, Value};
///
/// struct Greeter {
///     greeting: Arc<str>,
/// }
///
/// impl Controller for Greeter {
///     fn prefix(&self) -> &str {
///         "/greet"
///     }
///
///     fn routes(&self, routes: &mut Routes) {
///         let greeting = Arc::clone(&self.greeting);
///         routes
///             .get("/:name", "greeter.hello")
///             .params()
///             .handler(move |(params,): (Value,)| {
///                 let greeting = Arc::clone(&greeting);
///                 async move {
///                     let name = params["name"].as_str().unwrap_or_default().to_string();
///                     HeronResult::Ok(json!({ "message": format!("{greeting}, {name}") }))
///                 }
///             });
///     }
/// }
///
/// let mut routes = Routes::new();
/// routes.controller(&Greeter { greeting: "hello".into() });
/// assert_eq!(routes.definitions()[0].pattern().as_str(), "/greet/:name");
/// ```
pub trait Controller {
    /// Prefix joined onto every path this controller declares.
    fn prefix(&self) -> &str {
        ""
    }

    /// Declares the controller's routes.
    fn routes(&self, routes: &mut Routes);
}

/// Collects route definitions and their handlers.
///
/// Declaration problems (a bad pattern, an operation id registered twice)
/// are recorded and reported when the application is built, so declaring
/// stays infallible.
#[derive(Debug, Default)]
pub struct Routes {
    prefix: String,
    definitions: Vec<RouteDefinition>,
    operations: OperationRegistry,
    errors: Vec<AppError>,
}

impl Routes {
    /// Creates an empty builder with no prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a route declaration.
    pub fn route(
        &mut self,
        method: HttpMethod,
        path: impl Into<String>,
        operation_id: impl Into<String>,
    ) -> RouteBuilder<'_> {
        RouteBuilder {
            routes: self,
            method,
            path: path.into(),
            operation_id: operation_id.into(),
            bindings: Vec::new(),
            ttl_secs: None,
        }
    }

    /// Starts a `GET` route.
    pub fn get(&mut self, path: impl Into<String>, operation_id: impl Into<String>) -> RouteBuilder<'_> {
        self.route(HttpMethod::Get, path, operation_id)
    }

    /// Starts a `POST` route.
    pub fn post(&mut self, path: impl Into<String>, operation_id: impl Into<String>) -> RouteBuilder<'_> {
        self.route(HttpMethod::Post, path, operation_id)
    }

    /// Starts a `PUT` route.
    pub fn put(&mut self, path: impl Into<String>, operation_id: impl Into<String>) -> RouteBuilder<'_> {
        self.route(HttpMethod::Put, path, operation_id)
    }

    /// Starts a `PATCH` route.
    pub fn patch(&mut self, path: impl Into<String>, operation_id: impl Into<String>) -> RouteBuilder<'_> {
        self.route(HttpMethod::Patch, path, operation_id)
    }

    /// Starts a `DELETE` route.
    pub fn delete(&mut self, path: impl Into<String>, operation_id: impl Into<String>) -> RouteBuilder<'_> {
        self.route(HttpMethod::Delete, path, operation_id)
    }

    /// Declares routes under an additional prefix.
    pub fn scope(&mut self, prefix: &str, declare: impl FnOnce(&mut Self)) -> &mut Self {
        let joined = format!("{}/{prefix}", self.prefix);
        let outer = std::mem::replace(&mut self.prefix, joined);
        declare(self);
        self.prefix = outer;
        self
    }

    /// Declares a controller's routes under its prefix.
    pub fn controller<C: Controller + ?Sized>(&mut self, controller: &C) -> &mut Self {
        self.scope(controller.prefix(), |routes| controller.routes(routes))
    }

    /// Registers a handler that routes point at with [`RouteBuilder::declare`].
    pub fn operation<Args, Res, F, Fut>(&mut self, operation_id: impl Into<String>, handler: F) -> &mut Self
    where
        Args: FromArguments + Send + 'static,
        Res: Serialize + Send + 'static,
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HeronResult<Res>> + Send + 'static,
    {
        self.insert_operation(operation_id.into(), Operation::new(handler));
        self
    }

    /// Returns the routes declared so far, in registration order.
    #[must_use]
    pub fn definitions(&self) -> &[RouteDefinition] {
        &self.definitions
    }

    /// Returns the handlers registered so far.
    #[must_use]
    pub fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    pub(crate) fn into_parts(self) -> (Vec<RouteDefinition>, OperationRegistry, Vec<AppError>) {
        (self.definitions, self.operations, self.errors)
    }

    fn insert_operation(&mut self, operation_id: String, operation: Operation) {
        if self.operations.contains(&operation_id) {
            self.errors.push(AppError::DuplicateOperation(operation_id));
        } else {
            self.operations.insert(operation_id, operation);
        }
    }

    fn push_route(
        &mut self,
        method: HttpMethod,
        path: &str,
        operation_id: &str,
        bindings: Vec<ParamBinding>,
        ttl_secs: Option<u64>,
    ) {
        match PathPattern::join(&self.prefix, path) {
            Ok(pattern) => {
                let mut route = RouteDefinition::new(method, pattern, operation_id).with_bindings(bindings);
                if let Some(ttl) = ttl_secs {
                    route = route.cached(ttl);
                }
                self.definitions.push(route);
            }
            Err(e) => self.errors.push(e.into()),
        }
    }
}

/// A route being declared.
///
/// Nothing is recorded until [`handler`](Self::handler) or
/// [`declare`](Self::declare) is called.
#[must_use = "a route is only recorded by `handler` or `declare`"]
#[derive(Debug)]
pub struct RouteBuilder<'a> {
    routes: &'a mut Routes,
    method: HttpMethod,
    path: String,
    operation_id: String,
    bindings: Vec<ParamBinding>,
    ttl_secs: Option<u64>,
}

impl RouteBuilder<'_> {
    /// Appends a positional binding.
    pub fn bind(mut self, binding: ParamBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Binds the parsed JSON body.
    pub fn body(self) -> Self {
        self.bind(ParamBinding::WholeBody)
    }

    /// Binds all path parameters as one object.
    pub fn params(self) -> Self {
        self.bind(ParamBinding::WholeParams)
    }

    /// Binds all query parameters as one object.
    pub fn query(self) -> Self {
        self.bind(ParamBinding::WholeQuery)
    }

    /// Binds all request headers as one object.
    pub fn headers(self) -> Self {
        let position = self.bindings.len();
        self.bind(ParamBinding::Header(position))
    }

    /// Binds a single token claim; a missing claim binds `null`.
    pub fn claim(self, name: impl Into<String>) -> Self {
        self.bind(ParamBinding::Auth(ClaimSelector::named(name)))
    }

    /// Binds the whole claims object.
    pub fn claims(self) -> Self {
        self.bind(ParamBinding::Auth(ClaimSelector::All))
    }

    /// Caches successful responses for `ttl_secs` seconds.
    pub fn cached(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }

    /// Records the route and registers its handler under the operation id.
    pub fn handler<Args, Res, F, Fut>(self, handler: F)
    where
        Args: FromArguments + Send + 'static,
        Res: Serialize + Send + 'static,
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HeronResult<Res>> + Send + 'static,
    {
        self.routes
            .insert_operation(self.operation_id.clone(), Operation::new(handler));
        self.declare();
    }

    /// Records the route without a handler; the operation is registered
    /// elsewhere, for example with [`Routes::operation`].
    pub fn declare(self) {
        self.routes
            .push_route(self.method, &self.path, &self.operation_id, self.bindings, self.ttl_secs);
    }
}
