//! Global `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust,no_run
//! use verroute_extras::logging::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::default().json(true));
//! tracing::info!("ready");
//! ```

use crate::config::Environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of log lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub filter: Option<String>,
    pub format: LogFormat,
    /// Include the event target (module path) in each line
    pub with_target: bool,
    /// Environment profile supplying the fallback level
    pub environment: Environment,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            format: LogFormat::Compact,
            with_target: true,
            environment: Environment::current(),
        }
    }
}

impl LoggingConfig {
    /// Use `filter` unless `RUST_LOG` is set
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Switch JSON output on or off
    pub fn json(mut self, enabled: bool) -> Self {
        self.format = if enabled { LogFormat::Json } else { LogFormat::Compact };
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// The filter directive in effect when `RUST_LOG` is unset
    pub fn effective_filter(&self) -> String {
        self.filter
            .clone()
            .unwrap_or_else(|| self.environment.default_log_level().to_string())
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.effective_filter()))
    }
}

/// Install the global subscriber
///
/// Returns `false` when a global subscriber is already installed, in which
/// case nothing changes.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let installed = match config.format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(config.with_target))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(config.with_target))
            .try_init(),
    };

    if installed.is_err() {
        return false;
    }

    tracing::debug!(
        filter = %config.effective_filter(),
        format = ?config.format,
        environment = %config.environment,
        "logging initialised"
    );
    true
}
