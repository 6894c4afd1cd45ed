//! Request dispatch and the HTTP server for Heron.
//!
//! - [`Dispatcher`] runs one request through route matching,
//!   authentication, parameter extraction, the cache gate and the bound
//!   operation, and always produces exactly one JSON response.
//! - [`Server`] owns the TCP listener, serves HTTP/1.1 with Hyper, answers
//!   `GET /health`, and drains connections on shutdown.
//!
//! Every response carries `Content-Type: application/json` and
//! `X-Request-Id`. Failed requests get `{"error": "<message>"}`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dispatcher;
mod error;
mod health;
mod response;
mod server;
mod shutdown;

pub use dispatcher::Dispatcher;
pub use error::ServerError;
pub use health::{HealthCheck, HealthStatus, HEALTH_PATH};
pub use response::{error_response, json_response, with_cache_headers, HttpResponse, ResponseBody, REQUEST_ID_HEADER};
pub use server::{build_runtime, Server, ServerBuilder};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownReceiver, ShutdownSignal};
