//! JSON body parsing.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method};
use serde_json::{Map, Value};

use crate::error::ExtractionError;

/// The only media type whose bodies are parsed.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Returns true if the `Content-Type` header is exactly `application/json`.
///
/// The match is byte for byte: `Application/JSON` or
/// `application/json; charset=utf-8` are not JSON bodies.
#[must_use]
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes() == JSON_MEDIA_TYPE.as_bytes())
}

/// Parses the request body.
///
/// Bodies are only read for non-GET requests with a JSON content type; every
/// other request, and a JSON request with an empty body, yields an empty
/// object.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidJson`] when the body is declared as JSON
/// but does not parse.
pub fn parse_body(method: &Method, headers: &HeaderMap, body: &Bytes) -> Result<Value, ExtractionError> {
    if method == Method::GET || !is_json_content_type(headers) || body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(body).map_err(|e| ExtractionError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;

    fn json_headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_json_body() {
        let body = parse_body(
            &Method::POST,
            &json_headers("application/json"),
            &Bytes::from_static(br#"{"qty":3}"#),
        )
        .unwrap();
        assert_eq!(body, json!({ "qty": 3 }));
    }

    #[test]
    fn test_get_body_is_ignored() {
        let body = parse_body(
            &Method::GET,
            &json_headers("application/json"),
            &Bytes::from_static(br#"{"qty":3}"#),
        )
        .unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_other_content_type_is_ignored() {
        let body = parse_body(
            &Method::POST,
            &json_headers("text/plain"),
            &Bytes::from_static(b"not json"),
        )
        .unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_missing_content_type_is_ignored() {
        let body = parse_body(&Method::PUT, &HeaderMap::new(), &Bytes::from_static(b"{}")).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_empty_json_body() {
        let body = parse_body(&Method::POST, &json_headers("application/json"), &Bytes::new()).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_body(
            &Method::PATCH,
            &json_headers("application/json"),
            &Bytes::from_static(b"{not valid"),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidJson(_)));
    }

    #[test]
    fn test_content_type_must_match_exactly() {
        assert!(is_json_content_type(&json_headers("application/json")));
        assert!(!is_json_content_type(&json_headers("application/json; charset=utf-8")));
        assert!(!is_json_content_type(&json_headers("Application/JSON")));
        assert!(!is_json_content_type(&json_headers("application/jsonp")));
        assert!(!is_json_content_type(&json_headers("application/problem+json")));
    }

    #[test]
    fn test_charset_parameter_body_is_not_parsed() {
        let body = parse_body(
            &Method::POST,
            &json_headers("application/json; charset=utf-8"),
            &Bytes::from_static(b"{not valid"),
        )
        .unwrap();
        assert_eq!(body, json!({}));
    }
}
