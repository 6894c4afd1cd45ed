//! Core types for the Heron framework.
//!
//! This crate holds the types every other Heron crate agrees on:
//!
//! - [`HeronError`] and [`ErrorCategory`]: the request-level error taxonomy
//!   and its mapping to status codes and JSON error bodies.
//! - [`RequestContext`] and [`RequestId`]: per-request state.
//! - [`Claims`]: the decoded payload of a verified bearer token.
//! - [`Operation`], [`OperationRegistry`], [`Arguments`] and
//!   [`FromArguments`]: handlers and the positional arguments they take.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod claims;
mod context;
mod error;
mod operation;

pub use claims::Claims;
pub use context::{RequestContext, RequestId};
pub use error::{ErrorBody, ErrorCategory, HeronError, HeronResult};
pub use operation::{
    Arguments, BoxedOperationFuture, FromArguments, Operation, OperationRegistry,
};
