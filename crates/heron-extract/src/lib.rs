//! Request extraction and argument binding for Heron.
//!
//! Extraction happens in two steps:
//!
//! 1. [`ExtractedParams::extract`] decodes everything a binding could ask for
//!    (JSON body, query string, headers, path parameters) from a
//!    [`RequestContext`](heron_core::RequestContext).
//! 2. [`resolve_bindings`] walks a route's declared
//!    [`ParamBinding`](heron_router::ParamBinding)s and produces the
//!    positional [`Arguments`](heron_core::Arguments) for its operation.
//!
//! # Body rules
//!
//! A body is parsed only for non-GET requests whose `Content-Type` is
//! `application/json`. Anything else yields an empty object. A body that is
//! declared as JSON but fails to parse is a 400.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binding;
mod body;
mod error;
mod extracted;
mod headers;
mod query;

pub use binding::resolve_bindings;
pub use body::{is_json_content_type, parse_body, JSON_MEDIA_TYPE};
pub use error::{ExtractionError, ExtractionSource};
pub use extracted::ExtractedParams;
pub use headers::headers_to_json;
pub use query::parse_query;
