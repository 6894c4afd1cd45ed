//! Route definitions.
//!
//! A [`RouteDefinition`] is the unit the declaration surface hands to the
//! route table: method, pattern, target operation, ordered argument bindings
//! and an optional cache policy. Definitions are immutable once registered.

use std::fmt;

use crate::method::HttpMethod;
use crate::pattern::PathPattern;

/// Opaque handle identifying the operation a route invokes.
///
/// By convention this is `"<controller>.<method>"`, e.g. `"users.get"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(String);

impl OperationId {
    /// Creates a new operation id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OperationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which part of the decoded token claims an [`ParamBinding::Auth`] binds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimSelector {
    /// The whole claims object.
    All,
    /// A single claim by name.
    Named(String),
}

impl ClaimSelector {
    /// Creates a selector for a single named claim.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

/// Declares where one positional handler argument comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamBinding {
    /// The parsed JSON body.
    WholeBody,
    /// All captured path parameters.
    WholeParams,
    /// All query parameters.
    WholeQuery,
    /// The full header map. The index only records the declared position.
    Header(usize),
    /// A value taken from the verified token claims.
    Auth(ClaimSelector),
}

impl ParamBinding {
    /// Returns true for [`ParamBinding::Auth`].
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Response caching policy for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CachePolicy {
    /// Time to live of a cached response, in seconds.
    pub ttl_secs: u64,
}

impl CachePolicy {
    /// Creates a policy with the given TTL.
    #[must_use]
    pub const fn ttl(ttl_secs: u64) -> Self {
        Self { ttl_secs }
    }
}

/// A fully declared route.
///
/// # Example
///
/// ```rust
/// use heron_router::{ClaimSelector, HttpMethod, ParamBinding, PathPattern, RouteDefinition};
///
/// let route = RouteDefinition::new(
///     HttpMethod::Post,
///     PathPattern::parse("/orders").unwrap(),
///     "orders.create",
/// )
/// .bind(ParamBinding::WholeBody)
/// .bind(ParamBinding::Auth(ClaimSelector::named("sub")));
///
/// assert!(route.requires_auth());
/// assert_eq!(route.bindings().len(), 2);
/// assert!(route.cache_policy().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    method: HttpMethod,
    pattern: PathPattern,
    operation_id: OperationId,
    bindings: Vec<ParamBinding>,
    cache: Option<CachePolicy>,
}

impl RouteDefinition {
    /// Creates a route with no bindings and no cache policy.
    pub fn new(method: HttpMethod, pattern: PathPattern, operation_id: impl Into<OperationId>) -> Self {
        Self {
            method,
            pattern,
            operation_id: operation_id.into(),
            bindings: Vec::new(),
            cache: None,
        }
    }

    /// Appends a binding. Bindings are positional, in call order.
    pub fn bind(mut self, binding: ParamBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Replaces all bindings.
    pub fn with_bindings(mut self, bindings: impl IntoIterator<Item = ParamBinding>) -> Self {
        self.bindings = bindings.into_iter().collect();
        self
    }

    /// Caches successful responses for `ttl_secs` seconds.
    pub fn cached(mut self, ttl_secs: u64) -> Self {
        self.cache = Some(CachePolicy::ttl(ttl_secs));
        self
    }

    /// Returns the route's method.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the route's path pattern.
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Returns the target operation.
    #[must_use]
    pub fn operation_id(&self) -> &OperationId {
        &self.operation_id
    }

    /// Returns the bindings in positional order.
    #[must_use]
    pub fn bindings(&self) -> &[ParamBinding] {
        &self.bindings
    }

    /// Returns the cache policy, if any.
    #[must_use]
    pub fn cache_policy(&self) -> Option<CachePolicy> {
        self.cache
    }

    /// Returns true if any binding reads token claims.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.bindings.iter().any(ParamBinding::is_auth)
    }
}

impl fmt::Display for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.method, self.pattern, self.operation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str) -> RouteDefinition {
        RouteDefinition::new(HttpMethod::Get, PathPattern::parse(path).unwrap(), "test.op")
    }

    #[test]
    fn test_defaults() {
        let r = route("/health");
        assert!(r.bindings().is_empty());
        assert!(r.cache_policy().is_none());
        assert!(!r.requires_auth());
        assert_eq!(r.operation_id().as_str(), "test.op");
    }

    #[test]
    fn test_bindings_keep_declaration_order() {
        let r = route("/x")
            .bind(ParamBinding::WholeQuery)
            .bind(ParamBinding::Header(1))
            .bind(ParamBinding::WholeParams);
        assert_eq!(
            r.bindings(),
            &[
                ParamBinding::WholeQuery,
                ParamBinding::Header(1),
                ParamBinding::WholeParams
            ]
        );
    }

    #[test]
    fn test_requires_auth() {
        let r = route("/me").bind(ParamBinding::Auth(ClaimSelector::All));
        assert!(r.requires_auth());
    }

    #[test]
    fn test_cached() {
        let r = route("/report").cached(60);
        assert_eq!(r.cache_policy(), Some(CachePolicy { ttl_secs: 60 }));
    }

    #[test]
    fn test_display() {
        assert_eq!(route("/users/:id").to_string(), "GET /users/:id -> test.op");
    }
}
