//! Response construction.
//!
//! Every response Heron writes is JSON and carries the request id.

use bytes::Bytes;
use heron_cache::{cache_control, CacheStatus, CACHE_STATUS_HEADER};
use heron_core::{HeronError, RequestId};
use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http::{HeaderValue, Response, StatusCode};
use http_body_util::Full;

/// Response body type.
pub type ResponseBody = Full<Bytes>;

/// Response type returned by the dispatcher and the server.
pub type HttpResponse = Response<ResponseBody>;

/// Header echoing the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const JSON_CONTENT_TYPE: &str = "application/json";

const FALLBACK_ERROR_BODY: &[u8] = br#"{"error":"Internal Server Error"}"#;

/// Builds a JSON response.
pub fn json_response(status: StatusCode, body: Bytes, request_id: RequestId) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id.to_string())
        .body(Full::new(body))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// Builds the `{"error": ...}` response for `error`.
pub fn error_response(error: &HeronError, request_id: RequestId) -> HttpResponse {
    let body = serde_json::to_vec(&error.to_body())
        .map_or_else(|_| Bytes::from_static(FALLBACK_ERROR_BODY), Bytes::from);
    json_response(error.status_code(), body, request_id)
}

/// Adds `X-Cache` and `Cache-Control` to a cacheable route's response.
pub fn with_cache_headers(mut response: HttpResponse, status: CacheStatus, ttl_secs: u64) -> HttpResponse {
    let headers = response.headers_mut();
    headers.insert(CACHE_STATUS_HEADER, HeaderValue::from_static(status.as_str()));
    if let Ok(value) = HeaderValue::from_str(&cache_control(ttl_secs)) {
        headers.insert(CACHE_CONTROL, value);
    }
    response
}
