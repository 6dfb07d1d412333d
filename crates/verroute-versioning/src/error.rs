//! Error types for route compilation and resolution

use crate::predicate::RequestedVersion;
use crate::shape::PathError;
use crate::version::ApiVersion;
use http::Method;

/// Result type alias for route table compilation
pub type Result<T, E = BuildError> = std::result::Result<T, E>;

/// A declaration that cannot be compiled
///
/// Raised once, while building tables at startup, never per request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A path failed to tokenize
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// Global routes cannot be removed
    #[error("route {method} {path} is marked removed outside of any version scope")]
    GlobalRemoval { method: Method, path: String },

    /// The path matcher rejected a route shape
    #[error("route shape {path} conflicts with another route in {version}: {details}")]
    Conflict {
        version: ApiVersion,
        path: String,
        details: String,
    },
}

/// A request that no table can serve
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no route found for {method} {path} (requested version: {requested})")]
    NotFound {
        method: Method,
        path: String,
        requested: RequestedVersion,
        /// Version of the removal that hid the route, if one did
        removed_at: Option<ApiVersion>,
    },
}

impl ResolveError {
    /// Version of the removal that hid the route, if one did
    pub fn removed_at(&self) -> Option<ApiVersion> {
        match self {
            Self::NotFound { removed_at, .. } => *removed_at,
        }
    }
}
