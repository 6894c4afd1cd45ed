//! Configuration schema types.
//!
//! Every section rejects unknown keys and fills missing keys with defaults,
//! so an empty file is a valid configuration.

use std::fmt;

use heron_auth::AuthPolicy;
use heron_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};
use serde::{Deserialize, Serialize};

/// Server configuration section.
///
/// # Example
///
/// ```
/// use heron_config::ServerConfig;
///
/// let config = ServerConfig {
///     http_addr: "127.0.0.1:3000".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.workers, 0);
/// assert!(config.health_endpoint);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP server bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// How long in-flight connections may drain after a shutdown signal.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Tokio worker threads for this process. 0 keeps the runtime default.
    #[serde(default)]
    pub workers: usize,

    /// Answer `GET /health` before dispatch.
    #[serde(default = "default_true")]
    pub health_endpoint: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            workers: 0,
            health_endpoint: true,
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Token authentication section.
///
/// `ignore_expiration` defaults to `true`: tokens are accepted past their
/// `exp` claim unless this is turned off.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Shared HMAC secret. Authenticated routes answer 500 while unset.
    #[serde(default)]
    pub secret: Option<String>,

    /// Accept expired tokens.
    #[serde(default = "default_true")]
    pub ignore_expiration: bool,

    /// Accepted signing algorithms (HS256, HS384, HS512).
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ignore_expiration: true,
            algorithms: default_algorithms(),
        }
    }
}

fn default_algorithms() -> Vec<String> {
    vec!["HS256".to_string()]
}

impl AuthConfig {
    /// Builds the authenticator policy for this section.
    #[must_use]
    pub fn policy(&self) -> AuthPolicy {
        AuthPolicy::new(self.secret.clone(), self.ignore_expiration)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("ignore_expiration", &self.ignore_expiration)
            .field("algorithms", &self.algorithms)
            .finish()
    }
}

/// Cache store backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local store.
    #[default]
    Memory,
    /// Shared Redis store (requires the `redis` feature).
    Redis,
}

impl CacheBackend {
    /// Returns the configuration spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
        }
    }
}

/// Cache section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Store backend.
    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis connection URL, required for the redis backend.
    #[serde(default)]
    pub redis_url: Option<String>,
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines (production).
    #[default]
    Json,
    /// Human-readable multi-line output (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g., "info" or "heron_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Prometheus exporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Install the exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Exporter listen address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// Service name reported in logs and by the health endpoint.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            logging: LoggingConfig::default(),
            metrics: MetricsSection::default(),
        }
    }
}

fn default_service_name() -> String {
    "heron".to_string()
}

impl From<&TelemetrySection> for TelemetryConfig {
    fn from(section: &TelemetrySection) -> Self {
        Self {
            service_name: section.service_name.clone(),
            logging: LogConfig {
                enabled: section.logging.enabled,
                level: section.logging.level.clone(),
                json_format: section.logging.format == LogFormat::Json,
                include_target: true,
            },
            metrics: MetricsConfig {
                enabled: section.metrics.enabled,
                addr: section.metrics.addr.clone(),
            },
        }
    }
}
