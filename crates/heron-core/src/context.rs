//! Request context types.
//!
//! A [`RequestContext`] is created for each inbound request, filled in as the
//! dispatcher moves through its states, and dropped once the response has been
//! written. It is never shared between requests.

use std::time::{Duration, Instant};

use bytes::Bytes;
use heron_router::Params;
use http::{HeaderMap, Method};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::claims::Claims;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps request ids sortable in logs.
///
/// # Example
///
/// ```
/// use heron_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-request state.
///
/// Holds the raw request parts plus whatever the pipeline has learned so far:
/// the captured path parameters once a route matched, and the verified claims
/// once authentication succeeded.
///
/// # Example
///
/// ```
/// use heron_core::RequestContext;
/// use http::{HeaderMap, Method};
///
/// let ctx = RequestContext::new(Method::GET, "/users/42", Some("verbose=1"), HeaderMap::new(), Default::default());
/// assert_eq!(ctx.path(), "/users/42");
/// assert_eq!(ctx.query(), Some("verbose=1"));
/// assert!(ctx.auth_claims().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    auth_claims: Option<Claims>,
    operation_id: Option<String>,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context for a freshly received request.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        query: Option<&str>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            query: query.map(ToString::to_string),
            headers,
            body,
            path_params: Params::new(),
            auth_claims: None,
            operation_id: None,
            started_at: Instant::now(),
        }
    }

    /// Creates a `GET /` context for tests.
    #[must_use]
    pub fn mock() -> Self {
        Self::new(Method::GET, "/", None, HeaderMap::new(), Bytes::new())
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the raw method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the raw path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the captured path parameters.
    #[must_use]
    pub const fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Records the parameters captured by the matched route.
    pub fn set_path_params(&mut self, params: Params) {
        self.path_params = params;
    }

    /// Returns the verified claims, if authentication ran and succeeded.
    #[must_use]
    pub const fn auth_claims(&self) -> Option<&Claims> {
        self.auth_claims.as_ref()
    }

    /// Records the verified claims.
    pub fn set_auth_claims(&mut self, claims: Claims) {
        self.auth_claims = Some(claims);
    }

    /// Returns the matched operation ID, if a route matched.
    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Records the matched operation ID.
    pub fn set_operation_id(&mut self, operation_id: impl Into<String>) {
        self.operation_id = Some(operation_id.into());
    }

    /// Returns the time elapsed since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_new_generates_unique_ids() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2, "Each RequestId should be unique");
    }

    #[test]
    fn test_request_id_serializes_transparently() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn test_context_starts_empty() {
        let ctx = RequestContext::mock();
        assert_eq!(ctx.method(), Method::GET);
        assert!(ctx.path_params().is_empty());
        assert!(ctx.auth_claims().is_none());
        assert!(ctx.operation_id().is_none());
    }

    #[test]
    fn test_context_records_pipeline_state() {
        let mut ctx = RequestContext::mock();

        let mut params = Params::new();
        params.push("id", "42");
        ctx.set_path_params(params);
        ctx.set_operation_id("users.get");
        ctx.set_auth_claims(Claims::new());

        assert_eq!(ctx.path_params().get("id"), Some("42"));
        assert_eq!(ctx.operation_id(), Some("users.get"));
        assert!(ctx.auth_claims().is_some());
    }
}
