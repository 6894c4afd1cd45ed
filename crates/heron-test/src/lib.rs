//! Testing utilities for Heron applications.
//!
//! [`TestClient`] drives a [`Dispatcher`](heron_server::Dispatcher) in
//! memory: requests go through the full pipeline (matching, authentication,
//! extraction, cache gate, operation) without binding a socket, and come back
//! as a collected [`TestResponse`] with chainable assertions.
//!
//! ```rust,ignore
//! let client = TestClient::new(app.into_dispatcher());
//!
//! client
//!     .get("/users/42")
//!     .bearer_token(&token)
//!     .send()
//!     .await
//!     .assert_status_code(200)
//!     .assert_header("x-cache", "MISS");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequestBuilder;
pub use response::TestResponse;
