//! Layered configuration loading.
//!
//! Layers apply in call order: defaults or a preset, then a TOML or JSON
//! file, then `.env`, then environment variables. A file replaces the whole
//! configuration; keys it omits take their defaults.

use std::env;
use std::fs;
use std::path::Path;

use crate::{CacheBackend, ConfigError, HeronConfig, LogFormat};

/// Builder that loads a [`HeronConfig`].
///
/// # Example
///
/// ```no_run
/// use heron_config::ConfigLoader;
///
/// # fn main() -> Result<(), heron_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("heron.toml")?
///     .with_dotenv()?
///     .with_env_prefix("HERON")
///     .load()?;
///
/// println!("listening on {}", config.server.http_addr);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: HeronConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader starting from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HeronConfig::default(),
            env_prefix: None,
        }
    }

    /// Resets to the default configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = HeronConfig::default();
        self
    }

    /// Starts from [`HeronConfig::development`].
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = HeronConfig::development();
        self
    }

    /// Starts from [`HeronConfig::production`].
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = HeronConfig::production();
        self
    }

    /// Loads a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, has an
    /// unsupported extension, or does not parse (including unknown keys).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Loads a file if it exists.
    ///
    /// # Errors
    ///
    /// Same as [`with_file`](Self::with_file) when the file exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on a parse failure or a format other than
    /// "toml" or "json".
    ///
    /// # Example
    ///
    /// ```
    /// use heron_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[server]\nhttp_addr = \"127.0.0.1:3000\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Sets the environment variable prefix.
    ///
    /// Variables use the form `PREFIX__SECTION__KEY`, for example
    /// `HERON__SERVER__HTTP_ADDR=0.0.0.0:9000` or
    /// `HERON__TELEMETRY__LOGGING__LEVEL=debug`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads a `.env` file from the working directory, if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a `.env` file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::validation_error(format!("failed to load .env: {e}"))),
        }
    }

    /// Applies environment overrides, validates, and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or validation
    /// fails.
    pub fn load(mut self) -> Result<HeronConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> HeronConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<HeronConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        let mut vars: Vec<(String, String)> = env::vars().filter(|(k, _)| k.starts_with(&marker)).collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let path = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = path.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_int(key, value)?;
            }
            ["SERVER", "WORKERS"] => config.server.workers = parse_int(key, value)?,
            ["SERVER", "HEALTH_ENDPOINT"] => {
                config.server.health_endpoint = parse_bool_var(key, value)?;
            }

            ["AUTH", "SECRET"] => config.auth.secret = non_empty(value),
            ["AUTH", "IGNORE_EXPIRATION"] => {
                config.auth.ignore_expiration = parse_bool_var(key, value)?;
            }
            ["AUTH", "ALGORITHMS"] => {
                config.auth.algorithms = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }

            ["CACHE", "BACKEND"] => {
                config.cache.backend = match value.to_lowercase().as_str() {
                    "memory" => CacheBackend::Memory,
                    "redis" => CacheBackend::Redis,
                    _ => return Err(ConfigError::env_parse_error(key, "expected 'memory' or 'redis'")),
                };
            }
            ["CACHE", "REDIS_URL"] => config.cache.redis_url = non_empty(value),

            ["TELEMETRY", "SERVICE_NAME"] => config.telemetry.service_name = value.to_string(),
            ["TELEMETRY", "LOGGING", "ENABLED"] => {
                config.telemetry.logging.enabled = parse_bool_var(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "LEVEL"] => config.telemetry.logging.level = value.to_string(),
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                config.telemetry.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => return Err(ConfigError::env_parse_error(key, "expected 'json' or 'pretty'")),
                };
            }
            ["TELEMETRY", "METRICS", "ENABLED"] => {
                config.telemetry.metrics.enabled = parse_bool_var(key, value)?;
            }
            ["TELEMETRY", "METRICS", "ADDR"] => config.telemetry.metrics.addr = value.to_string(),

            // Unknown keys are ignored so unrelated HERON__ variables don't break startup.
            _ => {}
        }

        Ok(())
    }
}

fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_bool_var(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn apply(loader: &mut ConfigLoader, key: &str, value: &str) -> Result<(), ConfigError> {
        loader.apply_env_var(key, value, "HERON")
    }

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_loader_with_development() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.telemetry.logging.level, "debug");
        assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert!(!config.auth.ignore_expiration);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"auth": {"secret": "s3cret"}, "cache": {"backend": "memory"}}"#;
        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.auth.secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_loader_with_string_unsupported_format() {
        let result = ConfigLoader::new().with_string("a: 1", "yaml");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_loader_with_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nhttp_addr = \"127.0.0.1:4000\"\nworkers = 2").unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:4000");
        assert_eq!(config.server.workers, 2);
    }

    #[test]
    fn test_loader_with_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"telemetry": {{"service_name": "orders"}}}}"#).unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.telemetry.service_name, "orders");
    }

    #[test]
    fn test_loader_unknown_key_in_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 80").unwrap();

        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_loader_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_loader_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/heron.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_optional_file_missing() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/heron.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, HeronConfig::default());
    }

    #[test]
    fn test_env_var_server_keys() {
        let mut loader = ConfigLoader::new();
        apply(&mut loader, "HERON__SERVER__HTTP_ADDR", "127.0.0.1:9000").unwrap();
        apply(&mut loader, "HERON__SERVER__WORKERS", "8").unwrap();
        apply(&mut loader, "HERON__SERVER__HEALTH_ENDPOINT", "off").unwrap();

        let config = loader.load().unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:9000");
        assert_eq!(config.server.workers, 8);
        assert!(!config.server.health_endpoint);
    }

    #[test]
    fn test_env_var_auth_keys() {
        let mut loader = ConfigLoader::new();
        apply(&mut loader, "HERON__AUTH__SECRET", "s3cret").unwrap();
        apply(&mut loader, "HERON__AUTH__IGNORE_EXPIRATION", "false").unwrap();
        apply(&mut loader, "HERON__AUTH__ALGORITHMS", "HS256, HS384").unwrap();

        let config = loader.load().unwrap();
        assert_eq!(config.auth.secret.as_deref(), Some("s3cret"));
        assert!(!config.auth.ignore_expiration);
        assert_eq!(config.auth.algorithms, vec!["HS256", "HS384"]);
    }

    #[test]
    fn test_env_var_cache_and_telemetry_keys() {
        let mut loader = ConfigLoader::new();
        apply(&mut loader, "HERON__CACHE__BACKEND", "REDIS").unwrap();
        apply(&mut loader, "HERON__CACHE__REDIS_URL", "redis://127.0.0.1:6379").unwrap();
        apply(&mut loader, "HERON__TELEMETRY__LOGGING__FORMAT", "pretty").unwrap();
        apply(&mut loader, "HERON__TELEMETRY__METRICS__ENABLED", "1").unwrap();

        let config = loader.load().unwrap();
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
        assert!(config.telemetry.metrics.enabled);
    }

    #[test]
    fn test_env_var_parse_errors() {
        let mut loader = ConfigLoader::new();
        assert!(matches!(
            apply(&mut loader, "HERON__SERVER__WORKERS", "many"),
            Err(ConfigError::EnvParseError { .. })
        ));
        assert!(apply(&mut loader, "HERON__AUTH__IGNORE_EXPIRATION", "maybe").is_err());
        assert!(apply(&mut loader, "HERON__CACHE__BACKEND", "memcached").is_err());
        assert!(apply(&mut loader, "HERON_SERVER_WORKERS", "1").is_err());
    }

    #[test]
    fn test_env_var_unknown_key_ignored() {
        let mut loader = ConfigLoader::new();
        assert!(apply(&mut loader, "HERON__SERVER__MAX_CONNECTIONS", "10").is_ok());
    }

    #[test]
    fn test_env_overrides_from_process_environment() {
        env::set_var("HERONLOADERTEST__SERVER__SHUTDOWN_TIMEOUT_SECS", "5");
        env::set_var("HERONLOADERTEST_UNRELATED", "x");

        let config = ConfigLoader::new()
            .with_env_prefix("heronloadertest")
            .load()
            .unwrap();
        assert_eq!(config.server.shutdown_timeout_secs, 5);

        env::remove_var("HERONLOADERTEST__SERVER__SHUTDOWN_TIMEOUT_SECS");
        env::remove_var("HERONLOADERTEST_UNRELATED");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
