//! Configuration management with environment variable support.
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file. Variables already set in the environment win over the file.
//!
//! # Example
//!
//! ```ignore
//! use verroute_extras::config::{load_dotenv, ServerConfig};
//!
//! load_dotenv();
//! let config = ServerConfig::from_env()?;
//! println!("listening on {}", config.addr());
//! ```

use serde::Deserialize;
use std::fmt;

/// Prefix of every variable read by [`ServerConfig::from_env`]
pub const ENV_PREFIX: &str = "VERROUTE_";

/// Variable holding the environment profile
pub const ENV_PROFILE_VAR: &str = "VERROUTE_ENV";

/// Error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Envy(#[from] envy::Error),
}

/// Environment profile for the application.
///
/// Detected from the `VERROUTE_ENV` environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Development environment with debug logging.
    Development,
    /// Production environment.
    Production,
    /// Custom environment name for specialized deployments.
    Custom(String),
}

impl Environment {
    /// Detect the current environment from `VERROUTE_ENV`.
    ///
    /// Returns:
    /// - `Production` if the variable is "production" or "prod"
    /// - `Development` if it is "development", "dev", or not set
    /// - `Custom(name)` for any other value
    pub fn current() -> Self {
        match std::env::var(ENV_PROFILE_VAR).as_deref() {
            Ok("production") | Ok("prod") => Self::Production,
            Ok("development") | Ok("dev") => Self::Development,
            Ok(other) => Self::Custom(other.to_string()),
            Err(_) => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Get the environment name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Default `tracing` filter for this environment.
    ///
    /// - Development: "debug"
    /// - Production and custom profiles: "info"
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Production | Self::Custom(_) => "info",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Server settings read from `VERROUTE_*` variables
///
/// | Variable | Field | Default |
/// |----------|-------|---------|
/// | `VERROUTE_HOST` | `host` | `127.0.0.1` |
/// | `VERROUTE_PORT` | `port` | `8080` |
/// | `VERROUTE_LOG` | `log` | none |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// `tracing` filter directive overriding the environment default
    #[serde(default)]
    pub log: Option<String>,
}

impl ServerConfig {
    /// Load server settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, such
    /// as a non-numeric `VERROUTE_PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// The socket address to bind, as `host:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log: None,
        }
    }
}

/// Load environment variables from a `.env` file in the current directory.
///
/// A missing file is not an error. Existing variables are never overridden.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file path.
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}
