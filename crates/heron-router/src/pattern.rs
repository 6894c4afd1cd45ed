//! Path patterns.
//!
//! A pattern is an ordered list of segments, each either a literal or a
//! named capture written `:name`. Patterns are normalised once, when they are
//! built, so the matcher never has to reason about slashes.

use std::fmt;

use crate::error::RouteError;

/// Marker that introduces a named capture segment.
pub const CAPTURE_MARKER: char = ':';

/// One segment of a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Must equal the request segment exactly (case-sensitive).
    Literal(String),
    /// Matches any single request segment and records it under this name.
    Capture(String),
}

impl Segment {
    fn parse(raw: &str, pattern: &str) -> Result<Self, RouteError> {
        match raw.strip_prefix(CAPTURE_MARKER) {
            Some("") => Err(RouteError::EmptyCapture {
                pattern: pattern.to_string(),
            }),
            Some(name) => Ok(Self::Capture(name.to_string())),
            None => Ok(Self::Literal(raw.to_string())),
        }
    }
}

/// A normalised route path pattern such as `/users/:id`.
///
/// # Example
///
/// ```rust
/// use heron_router::{PathPattern, Segment};
///
/// let pattern = PathPattern::join("/api//", "/users/:id/").unwrap();
/// assert_eq!(pattern.as_str(), "/api/users/:id");
/// assert_eq!(
///     pattern.segments(),
///     &[
///         Segment::Literal("api".into()),
///         Segment::Literal("users".into()),
///         Segment::Capture("id".into()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPattern {
    path: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parses a single path into a pattern.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        Self::join("", path)
    }

    /// Joins a controller prefix and a route path into a pattern.
    ///
    /// The two parts are joined with a single `/`, runs of slashes collapse
    /// to one, and a trailing slash is dropped. The root path therefore
    /// normalises to a single empty segment, which matches the request path
    /// `/`.
    pub fn join(prefix: &str, path: &str) -> Result<Self, RouteError> {
        let normalized = normalize(&format!("/{prefix}/{path}"));
        let body = &normalized[1..];

        let mut segments = Vec::new();
        for raw in body.split('/') {
            let segment = Segment::parse(raw, &normalized)?;
            if let Segment::Capture(name) = &segment {
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Capture(n) if n == name))
                {
                    return Err(RouteError::DuplicateCapture {
                        name: name.clone(),
                        pattern: normalized,
                    });
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            path: normalized,
            segments,
        })
    }

    /// Returns the normalised pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Returns the pattern segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments a request path must have to match.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a normalised pattern has at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the capture names in declaration order.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Capture(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Collapses slash runs and strips the trailing slash. Input must start with `/`.
fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    fn cap(s: &str) -> Segment {
        Segment::Capture(s.to_string())
    }

    #[test]
    fn test_parse_literal_and_capture() {
        let pattern = PathPattern::parse("/users/:id").unwrap();
        assert_eq!(pattern.segments(), &[lit("users"), cap("id")]);
        assert_eq!(pattern.as_str(), "/users/:id");
    }

    #[test]
    fn test_join_collapses_slashes() {
        let pattern = PathPattern::join("/api/", "/v1//orders").unwrap();
        assert_eq!(pattern.as_str(), "/api/v1/orders");
        assert_eq!(pattern.len(), 3);
    }

    #[test]
    fn test_join_strips_trailing_slash() {
        let pattern = PathPattern::join("/users", "/").unwrap();
        assert_eq!(pattern.as_str(), "/users");
        assert_eq!(pattern.segments(), &[lit("users")]);
    }

    #[test]
    fn test_root_pattern_is_single_empty_segment() {
        let pattern = PathPattern::join("", "/").unwrap();
        assert_eq!(pattern.as_str(), "/");
        assert_eq!(pattern.segments(), &[lit("")]);
    }

    #[test]
    fn test_prefix_without_leading_slash() {
        let pattern = PathPattern::join("reports", "daily").unwrap();
        assert_eq!(pattern.as_str(), "/reports/daily");
    }

    #[test]
    fn test_empty_capture_rejected() {
        let err = PathPattern::parse("/users/:").unwrap_err();
        assert!(matches!(err, RouteError::EmptyCapture { .. }));
    }

    #[test]
    fn test_duplicate_capture_rejected() {
        let err = PathPattern::parse("/a/:id/b/:id").unwrap_err();
        assert_eq!(
            err,
            RouteError::DuplicateCapture {
                name: "id".to_string(),
                pattern: "/a/:id/b/:id".to_string(),
            }
        );
    }

    #[test]
    fn test_capture_names() {
        let pattern = PathPattern::parse("/orgs/:org/users/:user").unwrap();
        let names: Vec<_> = pattern.capture_names().collect();
        assert_eq!(names, vec!["org", "user"]);
    }
}
