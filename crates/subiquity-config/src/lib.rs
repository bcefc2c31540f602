#![deny(unsafe_code)]

//! Configuration loading and validation for the installer client tools.
//!
//! Loads TOML configuration files describing how to reach the installer
//! backend and how verbose logging should be. The client library itself
//! never reads configuration; binaries load a [`ClientConfig`] and turn its
//! [`EndpointConfig`] into an endpoint.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default Unix socket of the installer backend.
pub const DEFAULT_SOCKET_PATH: &str = "/run/subiquity/socket";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level client configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Where the backend listens.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend location: a Unix socket, or a host and port.
///
/// ## TOML Example
///
/// ```toml
/// [endpoint]
/// socket_path = "/run/subiquity/socket"
/// ```
///
/// or, for a backend bridged to TCP:
///
/// ```toml
/// [endpoint]
/// host = "127.0.0.1"
/// port = 8080
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Unix socket path. Defaults to [`DEFAULT_SOCKET_PATH`] when no host
    /// is configured either.
    #[serde(default)]
    pub socket_path: Option<String>,

    /// TCP host name or address.
    #[serde(default)]
    pub host: Option<String>,

    /// TCP port (required with `host`).
    #[serde(default)]
    pub port: Option<u16>,
}

/// Resolved backend location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointTarget<'a> {
    Unix(&'a str),
    Tcp { host: &'a str, port: u16 },
}

impl EndpointConfig {
    /// Resolve to a concrete target, falling back to the default socket.
    ///
    /// Assumes the config has been validated.
    pub fn target(&self) -> EndpointTarget<'_> {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => EndpointTarget::Tcp { host, port },
            _ => EndpointTarget::Unix(self.socket_path.as_deref().unwrap_or(DEFAULT_SOCKET_PATH)),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", or "error".
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = &self.endpoint;
        if endpoint.socket_path.is_some() && endpoint.host.is_some() {
            return Err(ConfigError::Validation(
                "endpoint.socket_path and endpoint.host are mutually exclusive".to_string(),
            ));
        }
        if let Some(path) = &endpoint.socket_path {
            if path.is_empty() {
                return Err(ConfigError::Validation(
                    "endpoint.socket_path must not be empty".to_string(),
                ));
            }
        }
        match (&endpoint.host, endpoint.port) {
            (Some(host), _) if host.is_empty() => {
                return Err(ConfigError::Validation(
                    "endpoint.host must not be empty".to_string(),
                ));
            }
            (Some(_), None | Some(0)) => {
                return Err(ConfigError::Validation(
                    "endpoint.port must be set and non-zero when endpoint.host is set".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(ConfigError::Validation(
                    "endpoint.port requires endpoint.host".to_string(),
                ));
            }
            _ => {}
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}
