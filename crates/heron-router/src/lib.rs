//! Route table and path matcher for Heron.
//!
//! Routes are kept in a flat, ordered [`RouteTable`]. A lookup walks the table
//! in registration order and returns the first route whose method and
//! [`PathPattern`] both match, so overlapping routes resolve to whichever was
//! registered first.
//!
//! Patterns are sequences of literal segments and named captures (`:name`).
//! A pattern matches a request path only when both have the same number of
//! segments and every literal is equal, byte for byte.
//!
//! # Example
//!
//! ```rust
//! use heron_router::{HttpMethod, ParamBinding, PathPattern, RouteDefinition, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table.register(
//!     RouteDefinition::new(
//!         HttpMethod::Get,
//!         PathPattern::join("/users", "/:id").unwrap(),
//!         "users.get",
//!     )
//!     .bind(ParamBinding::WholeParams),
//! );
//!
//! let found = table.find("GET", "/users/42").unwrap();
//! assert_eq!(found.route.operation_id().as_str(), "users.get");
//! assert_eq!(found.params.get("id"), Some("42"));
//!
//! assert!(table.find("GET", "/users").is_none());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod definition;
mod error;
mod matcher;
mod method;
mod params;
mod pattern;
mod table;

pub use definition::{CachePolicy, ClaimSelector, OperationId, ParamBinding, RouteDefinition};
pub use error::RouteError;
pub use matcher::{match_path, request_segments};
pub use method::HttpMethod;
pub use params::Params;
pub use pattern::{PathPattern, Segment, CAPTURE_MARKER};
pub use table::{RouteMatch, RouteTable};
