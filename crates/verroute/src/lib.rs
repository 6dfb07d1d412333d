//! # verroute
//!
//! Versioned HTTP routing. Routes are declared once per API version; a newer
//! version inherits every route of the older ones unless it overrides or
//! removes it. Clients pick a version with
//! `Accept: application/json; version=<n>` and get the route from the
//! highest declared version not above `n`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use verroute::prelude::*;
//!
//! async fn show_v1(params: PathParams) -> String {
//!     format!("v1 user {}", params.get("id").unwrap_or("?"))
//! }
//!
//! async fn show_v2(Version(version): Version, params: PathParams) -> String {
//!     format!("{} user {}", version.served, params.get("id").unwrap_or("?"))
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     VersionedApi::new()
//!         .version(1, |v| v.get("/users/:id", show_v1).deprecated(|d| d.get("/legacy", show_v1)))
//!         .version(2, |v| v.get("/users/:id", show_v2).removed(|r| r.get("/legacy", show_v1)))
//!         .get("/health", || async { "ok" })
//!         .run("127.0.0.1:8080")
//!         .await
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `config` - `.env` loading and `VERROUTE_*` server configuration
//! - `logging` - `tracing-subscriber` initialisation
//! - `extras` - both of the above (default)
//! - `test-utils` - `TestClient` for network-free tests

// Re-export core functionality
pub use verroute_core::*;

// Route table engine
pub use verroute_versioning::{
    deprecation, ApiVersion, BuildError, EffectiveRouteTable, RequestedVersion, ResolveError,
    RouteDeclaration, RouteKey, RouteSet, RouteSummary, RouteTables, Scope, ShapeKey,
    DEPRECATION_HEADER, DEPRECATION_MESSAGE,
};

#[cfg(feature = "config")]
pub use verroute_extras::config;
#[cfg(feature = "config")]
pub use verroute_extras::{load_dotenv, load_dotenv_from, ConfigError, Environment, ServerConfig};

#[cfg(feature = "logging")]
pub use verroute_extras::logging;
#[cfg(feature = "logging")]
pub use verroute_extras::{init_logging, LogFormat, LoggingConfig};

/// Prelude module - import everything you need with `use verroute::prelude::*`
pub mod prelude {
    pub use verroute_core::{
        // Error handling
        ApiError,
        Body,
        // Response wrappers
        Deprecated,
        DeprecationLayer,
        Headers,
        IntoResponse,
        // Extractors
        Json,
        Path,
        PathParams,
        Query,
        Request,
        Response,
        Result,
        // Route declarations
        Routes,
        State,
        // Middleware
        TracingLayer,
        Version,
        // App builder
        VersionedApi,
        VersionScope,
    };

    pub use verroute_versioning::{ApiVersion, RequestedVersion};

    // Re-export commonly used external types
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, trace, warn};

    #[cfg(feature = "config")]
    pub use verroute_extras::{load_dotenv, Environment, ServerConfig};

    #[cfg(feature = "logging")]
    pub use verroute_extras::{init_logging, LoggingConfig};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_imports_work() {
        let _: fn() -> Result<()> = || Ok(());
        assert_eq!(ApiVersion::new(2).to_string(), "v2");
    }
}
