//! # Configuration
//!
//! Application configuration loading and management.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables (prefixed with `MTT_GATEWAY_`), including those
//!    read from a `.env` file
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MTT_GATEWAY_CONFIG_FILE` | Configuration file | `config.toml` |
//! | `MTT_GATEWAY_REST_HOST` | HTTP server host | `0.0.0.0` |
//! | `MTT_GATEWAY_REST_PORT` | HTTP server port | `8000` |
//! | `MTT_GATEWAY_LOG_LEVEL` | Log level | `info` |
//! | `MTT_GATEWAY_LOG_FORMAT` | Log format (json/pretty) | `json` |
//! | `MTT_GATEWAY_DATABASE_URL` | PostgreSQL URL, falls back to `DATABASE_URL` | unset: in-memory |
//! | `MTT_GATEWAY_SERVICE_NAME` | Service name | `mtt-gateway` |
//! | `MTT_GATEWAY_ENVIRONMENT` | Deployment environment | `development` |
//!
//! # Examples
//!
//! ```no_run
//! use mtt_gateway::config::AppConfig;
//!
//! let config = AppConfig::load(None)?;
//! println!("listening on {}:{}", config.rest.host, config.rest.port);
//! # Ok::<(), mtt_gateway::config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "MTT_GATEWAY_";

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

// ============================================================================
// Server Configuration
// ============================================================================

/// REST/HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Server host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port.
    #[serde(default = "default_rest_port")]
    pub port: u16,

    /// Request timeout in seconds, `0` disables it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Allowed CORS origins; any origin when empty.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Log request headers (sensitive ones redacted).
    #[serde(default)]
    pub log_headers: bool,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_rest_port(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: Vec::new(),
            log_headers: false,
        }
    }
}

impl RestConfig {
    /// Returns the socket address for the REST server.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                field: "rest.host:port".to_string(),
                message: format!("{e}"),
            })
    }

    /// Returns the request timeout, `None` when disabled.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error) or a full `EnvFilter`
    /// directive such as `info,sqlx=warn`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include target (module path) in logs.
    #[serde(default = "default_true")]
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
            include_target: true,
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// Database configuration.
///
/// Without a URL the gateway keeps its records in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum connection pool size.
    #[serde(default = "default_pool_size")]
    pub max_connections: u32,

    /// Minimum connection pool size.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_pool_size(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connection_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// Returns the connection timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the idle connection timeout.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Returns the URL unless it is unset or blank.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST server configuration.
    #[serde(default)]
    pub rest: RestConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Service name for tracing.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Environment (development, staging, production).
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rest: RestConfig::default(),
            log: LogConfig::default(),
            database: DatabaseConfig::default(),
            service_name: default_service_name(),
            environment: default_environment(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the config file and the environment.
    ///
    /// `path` overrides `MTT_GATEWAY_CONFIG_FILE`. An explicit path must
    /// exist; the default `config.toml` is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = std::env::var(format!("{ENV_PREFIX}CONFIG_FILE"))
                    .unwrap_or_else(|_| "config.toml".to_string());
                if Path::new(&default_path).exists() {
                    Self::from_file(Path::new(&default_path))?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies environment overrides read through `var`.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let env = |name: &str| var(&format!("{ENV_PREFIX}{name}"));

        // REST configuration
        if let Some(host) = env("REST_HOST") {
            self.rest.host = host;
        }
        if let Some(port) = env("REST_PORT")
            && let Ok(p) = port.parse()
        {
            self.rest.port = p;
        }

        // Logging configuration
        if let Some(level) = env("LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = env("LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        // Database configuration
        if let Some(url) = env("DATABASE_URL").or_else(|| var("DATABASE_URL")) {
            self.database.url = Some(url);
        }

        // Service configuration
        if let Some(name) = env("SERVICE_NAME") {
            self.service_name = name;
        }
        if let Some(environment) = env("ENVIRONMENT") {
            self.environment = environment;
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rest.socket_addr()?;

        // The first directive carries the default level.
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let default_level = self
            .log
            .level
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if !valid_levels.contains(&default_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                message: format!(
                    "invalid log level '{}', must start with one of: {:?}",
                    self.log.level, valid_levels
                ),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::InvalidValue {
                field: "database.min_connections".to_string(),
                message: "must not exceed database.max_connections".to_string(),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rest_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_service_name() -> String {
    "mtt-gateway".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.rest.port, 8000);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.service_name, "mtt-gateway");
        assert!(config.database.url().is_none());
    }

    #[test]
    fn rest_config_socket_addr() {
        let addr = RestConfig::default().socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn request_timeout_zero_disables() {
        let config = RestConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.request_timeout().is_none());
        assert_eq!(
            RestConfig::default().request_timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn rest_config_invalid_address() {
        let config = RestConfig {
            host: "invalid host with spaces".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn log_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Json);
    }

    #[test]
    fn app_config_validate_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn app_config_validate_filter_directive() {
        let mut config = AppConfig::default();
        config.log.level = "debug,sqlx=warn".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn app_config_validate_invalid_log_level() {
        let mut config = AppConfig::default();
        config.log.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn app_config_validate_pool_bounds() {
        let mut config = AppConfig::default();
        config.database.min_connections = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_toml_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            environment = "production"

            [rest]
            port = 9000
            cors_origins = ["https://mtt.example"]

            [database]
            url = "postgres://localhost/mtt_gateway"
            "#,
        )
        .unwrap();

        assert_eq!(config.rest.port, 9000);
        assert_eq!(config.rest.host, "0.0.0.0");
        assert_eq!(config.rest.cors_origins, vec!["https://mtt.example".to_string()]);
        assert_eq!(config.environment, "production");
        assert_eq!(config.database.url(), Some("postgres://localhost/mtt_gateway"));
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn from_toml_rejects_garbage() {
        assert!(matches!(
            AppConfig::from_toml("rest = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(vars(&[
            ("MTT_GATEWAY_REST_PORT", "9100"),
            ("MTT_GATEWAY_LOG_FORMAT", "PRETTY"),
            ("MTT_GATEWAY_ENVIRONMENT", "staging"),
            ("MTT_GATEWAY_REST_HOST", "127.0.0.1"),
        ]));

        assert_eq!(config.rest.port, 9100);
        assert_eq!(config.rest.host, "127.0.0.1");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.environment, "staging");
    }

    #[test]
    fn unparsable_port_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(vars(&[("MTT_GATEWAY_REST_PORT", "eighty")]));
        assert_eq!(config.rest.port, 8000);
    }

    #[test]
    fn plain_database_url_is_a_fallback() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(vars(&[("DATABASE_URL", "postgres://fallback/db")]));
        assert_eq!(config.database.url(), Some("postgres://fallback/db"));

        let mut config = AppConfig::default();
        config.apply_env_overrides(vars(&[
            ("DATABASE_URL", "postgres://fallback/db"),
            ("MTT_GATEWAY_DATABASE_URL", "postgres://primary/db"),
        ]));
        assert_eq!(config.database.url(), Some("postgres://primary/db"));
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = DatabaseConfig {
            url: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.url().is_none());
    }
}
