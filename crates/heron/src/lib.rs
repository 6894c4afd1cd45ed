//! # Heron
//!
//! **A minimal JSON HTTP framework**
//!
//! Heron maps declared routes onto async handlers:
//!
//! - Routes are plain data (method, path pattern, operation id, positional
//!   bindings, optional cache TTL) declared through [`Routes`], usually from a
//!   [`Controller`].
//! - Handler arguments are bound positionally from the JSON body, path
//!   parameters, query string, headers or bearer-token claims.
//! - Routes that read claims require a valid `Authorization: Bearer` token.
//! - Cacheable routes are answered from a shared [`CacheStore`](heron_cache::CacheStore)
//!   within their TTL.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use heron::prelude::*;
//! use serde_json::{json, Value};
//!
//! struct Orders;
//!
//! impl Controller for Orders {
//!     fn prefix(&self) -> &str {
//!         "/orders"
//!     }
//!
//!     fn routes(&self, routes: &mut Routes) {
//!         routes
//!             .post("/", "orders.create")
//!             .body()
//!             .claim("sub")
//!             .handler(|(order, owner): (Value, String)| async move {
//!                 HeronResult::Ok(json!({ "order": order, "owner": owner }))
//!             });
//!
//!         routes
//!             .get("/:id", "orders.get")
//!             .params()
//!             .cached(60)
//!             .handler(|(params,): (Value,)| async move {
//!                 HeronResult::Ok(json!({ "id": params["id"] }))
//!             });
//!     }
//! }
//!
//! fn main() -> Result<(), AppError> {
//!     App::from_env()?.controller(Orders).run()
//! }
//! ```
//!
//! ## Request pipeline
//!
//! ```text
//! match route → authenticate → extract → cache lookup → invoke → cache store → respond
//!     404            401          400          HIT                 500
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod controller;
mod error;

pub use app::{App, DEFAULT_CONFIG_FILE, DEFAULT_ENV_PREFIX};
pub use controller::{Controller, RouteBuilder, Routes};
pub use error::AppError;

// Re-export core types
pub use heron_core as core;

// Re-export route table types
pub use heron_router as router;

// Re-export extraction types
pub use heron_extract as extract;

// Re-export authentication types
pub use heron_auth as auth;

// Re-export cache gate and stores
pub use heron_cache as cache;

// Re-export dispatcher and server types
pub use heron_server as server;

// Re-export configuration types
pub use heron_config as config;

// Re-export telemetry setup
pub use heron_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use heron::prelude::*;
///
/// let app = App::new();
/// assert_eq!(app.config().server.http_addr, "0.0.0.0:8080");
/// ```
pub mod prelude {
    pub use crate::{App, AppError, Controller, RouteBuilder, Routes};

    pub use heron_core::{Claims, ErrorCategory, HeronError, HeronResult, RequestId};

    pub use heron_router::{ClaimSelector, HttpMethod, ParamBinding};

    pub use heron_auth::{AuthPolicy, TokenVerifier};

    pub use heron_cache::{CacheStore, InMemoryStore};

    pub use heron_config::{ConfigLoader, HeronConfig};

    pub use heron_server::{Dispatcher, Server};
}
