//! Segment-wise path matching.
//!
//! Matching is a pure function of a pattern and a request path; it holds no
//! state and may be called from any number of tasks at once.

use crate::params::Params;
use crate::pattern::{PathPattern, Segment};

/// Splits a request path into segments.
///
/// The single leading `/` is dropped; everything else, including empty
/// segments produced by a trailing or doubled slash, is kept.
pub fn request_segments(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

/// Matches `path` against `pattern`.
///
/// Returns the captured parameters when the segment counts are equal and every
/// literal segment equals its request segment exactly; `None` otherwise.
///
/// # Example
///
/// ```rust
/// use heron_router::{match_path, PathPattern};
///
/// let pattern = PathPattern::parse("/users/:id").unwrap();
///
/// let params = match_path(&pattern, "/users/42").unwrap();
/// assert_eq!(params.get("id"), Some("42"));
///
/// assert!(match_path(&pattern, "/users").is_none());
/// assert!(match_path(&pattern, "/Users/42").is_none());
/// ```
#[must_use]
pub fn match_path(pattern: &PathPattern, path: &str) -> Option<Params> {
    if request_segments(path).count() != pattern.len() {
        return None;
    }

    let mut params = Params::new();
    for (expected, actual) in pattern.segments().iter().zip(request_segments(path)) {
        match expected {
            Segment::Capture(name) => params.push(name.as_str(), actual),
            Segment::Literal(literal) if literal == actual => {}
            Segment::Literal(_) => return None,
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pattern(path: &str) -> PathPattern {
        PathPattern::parse(path).unwrap()
    }

    #[test]
    fn test_static_match() {
        assert!(match_path(&pattern("/users"), "/users").is_some());
        assert!(match_path(&pattern("/users"), "/posts").is_none());
    }

    #[test]
    fn test_capture_match() {
        let params = match_path(&pattern("/orgs/:org/users/:user"), "/orgs/acme/users/7").unwrap();
        assert_eq!(params.get("org"), Some("acme"));
        assert_eq!(params.get("user"), Some("7"));
    }

    #[test]
    fn test_segment_count_must_match() {
        let p = pattern("/users/:id");
        assert!(match_path(&p, "/users").is_none());
        assert!(match_path(&p, "/users/1/extra").is_none());
    }

    #[test]
    fn test_literal_is_case_sensitive() {
        assert!(match_path(&pattern("/users"), "/USERS").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let p = PathPattern::join("", "/").unwrap();
        assert!(match_path(&p, "/").is_some());
        assert!(match_path(&p, "").is_some());
        assert!(match_path(&p, "/users").is_none());
    }

    #[test]
    fn test_request_trailing_slash_adds_segment() {
        let p = pattern("/users");
        assert!(match_path(&p, "/users/").is_none());
    }

    #[test]
    fn test_capture_matches_empty_segment() {
        let params = match_path(&pattern("/files/:name"), "/files/").unwrap();
        assert_eq!(params.get("name"), Some(""));
    }

    fn segment_strategy() -> impl Strategy<Value = (bool, String)> {
        (any::<bool>(), "[a-c]{1,2}")
    }

    proptest! {
        #[test]
        fn prop_match_iff_counts_equal_and_literals_equal(
            spec in prop::collection::vec(segment_strategy(), 1..5),
            request in prop::collection::vec("[a-c]{1,2}", 1..5),
        ) {
            let text: Vec<String> = spec
                .iter()
                .enumerate()
                .map(|(i, (is_capture, lit))| {
                    if *is_capture { format!(":p{i}") } else { lit.clone() }
                })
                .collect();
            let p = pattern(&format!("/{}", text.join("/")));
            let path = format!("/{}", request.join("/"));

            let expected = spec.len() == request.len()
                && spec
                    .iter()
                    .zip(&request)
                    .all(|((is_capture, lit), actual)| *is_capture || lit == actual);

            let result = match_path(&p, &path);
            prop_assert_eq!(result.is_some(), expected);

            if let Some(params) = result {
                for (i, (is_capture, _)) in spec.iter().enumerate() {
                    if *is_capture {
                        let name = format!("p{i}");
                        prop_assert_eq!(params.get(&name), Some(request[i].as_str()));
                    }
                }
            }
        }
    }
}
