//! The ordered route table.

use crate::definition::RouteDefinition;
use crate::matcher::match_path;
use crate::params::Params;

/// A matched route with its captured path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The matched route.
    pub route: &'a RouteDefinition,
    /// Captured path parameters.
    pub params: Params,
}

/// An append-only, ordered list of routes.
///
/// Lookups walk the table in registration order and return the first route
/// whose method and pattern both match. Overlapping patterns are allowed; the
/// route registered first always wins, whatever its specificity.
///
/// # Example
///
/// ```rust
/// use heron_router::{HttpMethod, PathPattern, RouteDefinition, RouteTable};
///
/// let mut table = RouteTable::new();
/// table.register(RouteDefinition::new(
///     HttpMethod::Get,
///     PathPattern::parse("/a/:x").unwrap(),
///     "a.any",
/// ));
/// table.register(RouteDefinition::new(
///     HttpMethod::Get,
///     PathPattern::parse("/a/b").unwrap(),
///     "a.b",
/// ));
///
/// let found = table.find("GET", "/a/b").unwrap();
/// assert_eq!(found.route.operation_id().as_str(), "a.any");
/// assert_eq!(found.params.get("x"), Some("b"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route.
    pub fn register(&mut self, route: RouteDefinition) {
        self.routes.push(route);
    }

    /// Returns every route in registration order.
    #[must_use]
    pub fn all(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// Iterates routes in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, RouteDefinition> {
        self.routes.iter()
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Finds the first route matching `method` (any ASCII case) and `path`.
    #[must_use]
    pub fn find(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method().matches(method))
            .find_map(|route| {
                match_path(route.pattern(), path).map(|params| RouteMatch { route, params })
            })
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteDefinition;
    type IntoIter = std::slice::Iter<'a, RouteDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

impl FromIterator<RouteDefinition> for RouteTable {
    fn from_iter<I: IntoIterator<Item = RouteDefinition>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

impl Extend<RouteDefinition> for RouteTable {
    fn extend<I: IntoIterator<Item = RouteDefinition>>(&mut self, iter: I) {
        self.routes.extend(iter);
    }
}
