//! # verroute-extras
//!
//! Process-level setup for verroute services.
//!
//! ## Features
//!
//! - `config` - `.env` loading and `VERROUTE_*` environment configuration
//! - `logging` - `tracing-subscriber` initialisation (enables `config`)

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "logging")]
pub mod logging;

#[cfg(feature = "config")]
pub use config::{load_dotenv, load_dotenv_from, ConfigError, Environment, ServerConfig};

#[cfg(feature = "logging")]
pub use logging::{init_logging, LogFormat, LoggingConfig};
