//! Top-level configuration.

use std::net::SocketAddr;

use heron_auth::JwtVerifier;
use heron_telemetry::logging::create_env_filter;
use serde::{Deserialize, Serialize};

use crate::{AuthConfig, CacheBackend, CacheConfig, ConfigError, LogFormat, ServerConfig, TelemetrySection};

/// Complete Heron server configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and the
/// environment.
///
/// # Example
///
/// ```
/// use heron_config::HeronConfig;
///
/// let config = HeronConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HeronConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Bearer token settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging and metrics settings.
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl HeronConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending key:
    /// an unparseable socket address, log filter or algorithm name, or a
    /// redis backend without a usable URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_addr("server.http_addr", &self.server.http_addr)?;

        if self.telemetry.metrics.enabled {
            parse_addr("telemetry.metrics.addr", &self.telemetry.metrics.addr)?;
        }

        if self.telemetry.logging.enabled {
            create_env_filter(&self.telemetry.logging.level)
                .map_err(|e| ConfigError::invalid_value("telemetry.logging.level", e.to_string()))?;
        }

        self.verifier()?;

        if self.cache.backend == CacheBackend::Redis {
            match self.cache.redis_url.as_deref() {
                None | Some("") => {
                    return Err(ConfigError::invalid_value(
                        "cache.redis_url",
                        "required when cache.backend is 'redis'",
                    ))
                }
                Some(url) if !(url.starts_with("redis://") || url.starts_with("rediss://")) => {
                    return Err(ConfigError::invalid_value(
                        "cache.redis_url",
                        "expected a redis:// or rediss:// URL",
                    ))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Builds the token verifier for `auth.algorithms`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty list or a name that
    /// is not an HMAC algorithm.
    pub fn verifier(&self) -> Result<JwtVerifier, ConfigError> {
        JwtVerifier::with_algorithms(&self.auth.algorithms)
            .map_err(|e| ConfigError::invalid_value("auth.algorithms", e.message()))
    }

    /// Returns the parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `server.http_addr` is not a
    /// socket address.
    pub fn http_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr("server.http_addr", &self.server.http_addr)
    }

    /// Development preset: pretty debug logs.
    ///
    /// # Example
    ///
    /// ```
    /// use heron_config::{HeronConfig, LogFormat};
    ///
    /// let config = HeronConfig::development();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config
    }

    /// Production preset: JSON logs at info, expired tokens rejected.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.auth.ignore_expiration = false;
        config
    }
}

fn parse_addr(field: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid_value(field, format!("invalid socket address: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(HeronConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_server_addr() {
        let mut config = HeronConfig::default();
        config.server.http_addr = "localhost".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.http_addr"));
    }

    #[test]
    fn test_validate_metrics_addr_only_when_enabled() {
        let mut config = HeronConfig::default();
        config.telemetry.metrics.addr = "nope".to_string();
        assert!(config.validate().is_ok());

        config.telemetry.metrics.enabled = true;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("telemetry.metrics.addr"));
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = HeronConfig::default();
        config.telemetry.logging.level = "info,[".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("telemetry.logging.level"));
    }

    #[test]
    fn test_validate_algorithms() {
        let mut config = HeronConfig::default();
        config.auth.algorithms = vec!["RS256".to_string()];
        assert!(config.validate().is_err());

        config.auth.algorithms = vec![];
        assert!(config.validate().is_err());

        config.auth.algorithms = vec!["HS256".to_string(), "HS512".to_string()];
        assert!(config.validate().is_ok());
        assert_eq!(config.verifier().unwrap().algorithms().len(), 2);
    }

    #[test]
    fn test_validate_redis_requires_url() {
        let mut config = HeronConfig::default();
        config.cache.backend = CacheBackend::Redis;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache.redis_url"));

        config.cache.redis_url = Some("http://cache:6379".to_string());
        assert!(config.validate().is_err());

        config.cache.redis_url = Some("redis://cache:6379/0".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = HeronConfig::development();
        assert_eq!(dev.telemetry.logging.level, "debug");
        assert!(dev.auth.ignore_expiration);

        let prod = HeronConfig::production();
        assert_eq!(prod.telemetry.logging.format, LogFormat::Json);
        assert!(!prod.auth.ignore_expiration);
    }

    #[test]
    fn test_http_addr() {
        let config = HeronConfig::default();
        assert_eq!(config.http_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_toml_deserialization() {
        let config: HeronConfig = toml::from_str(
            r#"
            [server]
            http_addr = "127.0.0.1:3000"
            workers = 4

            [auth]
            secret = "s3cret"
            ignore_expiration = false

            [telemetry.logging]
            format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.http_addr, "127.0.0.1:3000");
        assert_eq!(config.server.workers, 4);
        assert_eq!(config.auth.secret.as_deref(), Some("s3cret"));
        assert!(!config.auth.ignore_expiration);
        assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(toml::from_str::<HeronConfig>("[contract]\nenabled = true").is_err());
    }
}
