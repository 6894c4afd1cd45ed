//! Query string parsing.

use serde_json::{Map, Value};

use crate::error::ExtractionError;

/// Parses a raw query string into a JSON object of strings.
///
/// Keys and values are percent-decoded (`+` decodes to a space). When a key
/// repeats, the last value wins. A missing or empty query yields an empty
/// object.
///
/// # Example
///
/// ```rust
/// use heron_extract::parse_query;
/// use serde_json::json;
///
/// let query = parse_query(Some("q=heron+rust&page=2&page=3")).unwrap();
/// assert_eq!(serde_json::Value::Object(query), json!({ "q": "heron rust", "page": "3" }));
/// ```
pub fn parse_query(raw: Option<&str>) -> Result<Map<String, Value>, ExtractionError> {
    let Some(raw) = raw.filter(|q| !q.is_empty()) else {
        return Ok(Map::new());
    };

    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(raw).map_err(|e| ExtractionError::InvalidQuery(e.to_string()))?;

    Ok(pairs
        .into_iter()
        .fold(Map::new(), |mut map, (key, value)| {
            map.insert(key, Value::String(value));
            map
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_query() {
        assert!(parse_query(None).unwrap().is_empty());
        assert!(parse_query(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_simple_query() {
        let query = parse_query(Some("limit=10&offset=20")).unwrap();
        assert_eq!(query.get("limit"), Some(&json!("10")));
        assert_eq!(query.get("offset"), Some(&json!("20")));
    }

    #[test]
    fn test_last_value_wins() {
        let query = parse_query(Some("tag=a&tag=b&tag=c")).unwrap();
        assert_eq!(query.len(), 1);
        assert_eq!(query.get("tag"), Some(&json!("c")));
    }

    #[test]
    fn test_percent_decoding() {
        let query = parse_query(Some("name=J%C3%BCrgen&path=%2Fhome")).unwrap();
        assert_eq!(query.get("name"), Some(&json!("Jürgen")));
        assert_eq!(query.get("path"), Some(&json!("/home")));
    }

    #[test]
    fn test_key_without_value() {
        let query = parse_query(Some("flag&x=1")).unwrap();
        assert_eq!(query.get("flag"), Some(&json!("")));
        assert_eq!(query.get("x"), Some(&json!("1")));
    }
}
