//! Header passthrough.

use http::HeaderMap;
use serde_json::{Map, Value};

/// Converts request headers into a JSON object keyed by lower-case name.
///
/// The mapping is lossy. A header sent more than once becomes one string
/// joined with `", "` in arrival order, so values that themselves contain a
/// comma cannot be told apart afterwards. Values that are not visible ASCII
/// are skipped, and a name whose values are all skipped is absent.
#[must_use]
pub fn headers_to_json(headers: &HeaderMap) -> Map<String, Value> {
    let mut map = Map::new();
    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if !values.is_empty() {
            map.insert(name.as_str().to_string(), Value::String(values.join(", ")));
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderName, HeaderValue};
    use serde_json::json;

    #[test]
    fn test_names_are_lower_case() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-request-source"),
            HeaderValue::from_static("mobile"),
        );
        headers.insert(http::header::ACCEPT, HeaderValue::from_static("*/*"));

        let json = Value::Object(headers_to_json(&headers));
        assert_eq!(json, json!({ "x-request-source": "mobile", "accept": "*/*" }));
    }

    #[test]
    fn test_repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("x-tag", HeaderValue::from_static("a"));
        headers.append("x-tag", HeaderValue::from_static("b"));

        assert_eq!(headers_to_json(&headers).get("x-tag"), Some(&json!("a, b")));
    }

    #[test]
    fn test_opaque_values_are_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("x-binary", HeaderValue::from_bytes(&[0xFF, 0xFE]).unwrap());
        headers.insert("x-text", HeaderValue::from_static("ok"));

        let json = headers_to_json(&headers);
        assert!(json.get("x-binary").is_none());
        assert_eq!(json.get("x-text"), Some(&json!("ok")));
    }

    #[test]
    fn test_joining_loses_value_boundaries() {
        let mut headers = HeaderMap::new();
        headers.append("x-list", HeaderValue::from_static("a, b"));
        headers.append("x-list", HeaderValue::from_static("c"));
        headers.append("x-list", HeaderValue::from_bytes(&[0xFF]).unwrap());

        let mut flat = HeaderMap::new();
        flat.insert("x-list", HeaderValue::from_static("a, b, c"));

        assert_eq!(headers_to_json(&headers), headers_to_json(&flat));
    }
}
