//! Typed configuration for Heron servers.
//!
//! [`HeronConfig`] has four sections, each rejecting unknown keys:
//!
//! - [`ServerConfig`]: listen address, shutdown drain, worker threads,
//!   health endpoint;
//! - [`AuthConfig`]: token secret, expiry policy, accepted algorithms;
//! - [`CacheConfig`]: cache store backend;
//! - [`TelemetrySection`]: service name, logging and metrics.
//!
//! [`ConfigLoader`] layers defaults, a TOML or JSON file, `.env` and
//! `PREFIX__SECTION__KEY` environment variables, then validates.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! workers = 0
//! health_endpoint = true
//!
//! [auth]
//! secret = "change-me"
//! ignore_expiration = true
//! algorithms = ["HS256"]
//!
//! [cache]
//! backend = "memory"
//!
//! [telemetry]
//! service_name = "users"
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//!
//! [telemetry.metrics]
//! enabled = false
//! addr = "0.0.0.0:9090"
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::HeronConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    AuthConfig, CacheBackend, CacheConfig, LogFormat, LoggingConfig, MetricsSection, ServerConfig,
    TelemetrySection,
};
