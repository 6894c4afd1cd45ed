//! The full set of bindable request values.

use heron_core::RequestContext;
use serde_json::Value;

use crate::body::parse_body;
use crate::error::ExtractionError;
use crate::headers::headers_to_json;
use crate::query::parse_query;

/// Every value a route binding can draw from, decoded once per request.
///
/// Each field is a JSON value so the binding step can hand it to any handler
/// argument type that deserializes from it.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use heron_core::RequestContext;
/// use heron_extract::ExtractedParams;
/// use heron_router::Params;
/// use http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, Method};
/// use serde_json::json;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
///
/// let mut ctx = RequestContext::new(
///     Method::POST,
///     "/orders/7",
///     Some("dry_run=true"),
///     headers,
///     Bytes::from_static(br#"{"qty":3}"#),
/// );
/// let mut params = Params::new();
/// params.push("id", "7");
/// ctx.set_path_params(params);
///
/// let extracted = ExtractedParams::extract(&ctx).unwrap();
/// assert_eq!(extracted.body, json!({ "qty": 3 }));
/// assert_eq!(extracted.path_params, json!({ "id": "7" }));
/// assert_eq!(extracted.query, json!({ "dry_run": "true" }));
/// assert_eq!(extracted.headers["content-type"], json!("application/json"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedParams {
    /// Parsed JSON body, or an empty object.
    pub body: Value,
    /// Captured path parameters as an object of strings.
    pub path_params: Value,
    /// Headers as an object keyed by lower-case name.
    pub headers: Value,
    /// Query parameters as an object of strings.
    pub query: Value,
}

impl ExtractedParams {
    /// Extracts all bindable values from a request.
    ///
    /// Path parameters are read from the context, so the matcher must have
    /// recorded them first.
    pub fn extract(ctx: &RequestContext) -> Result<Self, ExtractionError> {
        Ok(Self {
            body: parse_body(ctx.method(), ctx.headers(), ctx.body())?,
            path_params: ctx.path_params().to_json(),
            headers: Value::Object(headers_to_json(ctx.headers())),
            query: Value::Object(parse_query(ctx.query())?),
        })
    }
}
