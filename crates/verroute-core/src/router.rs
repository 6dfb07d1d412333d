//! Versioned request dispatch
//!
//! [`VersionedRouter`] wraps compiled [`RouteTables`] of boxed handlers. For
//! every request it reads the requested version from the `Accept` header and
//! resolves method and path against the matching version's table, falling
//! back to global routes.

use crate::handler::BoxedHandler;
use http::{Extensions, HeaderMap, Method};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use verroute_versioning::{
    ApiVersion, RequestedVersion, ResolveError, RouteDeclaration, RouteTables,
};

/// Version details of a resolved request
///
/// Carried by every dispatched [`Request`](crate::Request) and available to
/// handlers through the `Version` extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    /// What the caller asked for
    #[serde(serialize_with = "serialize_requested")]
    pub requested: RequestedVersion,
    /// The table that served the request; `v0` for global routes
    pub served: ApiVersion,
    /// Whether the declaration is marked deprecated
    pub deprecated: bool,
}

fn serialize_requested<S: serde::Serializer>(
    requested: &RequestedVersion,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match requested.explicit() {
        Some(version) => version.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Result of route matching
pub(crate) enum RouteMatch {
    Found {
        handler: BoxedHandler,
        params: HashMap<String, String>,
        version: ResolvedVersion,
    },
    NotFound(ResolveError),
}

/// Router over compiled version tables
#[derive(Clone)]
pub struct VersionedRouter {
    tables: Arc<RouteTables<BoxedHandler>>,
    state: Arc<Extensions>,
}

impl VersionedRouter {
    pub(crate) fn new(tables: RouteTables<BoxedHandler>, state: Extensions) -> Self {
        Self {
            tables: Arc::new(tables),
            state: Arc::new(state),
        }
    }

    /// Resolve a request head against the version tables
    pub(crate) fn match_route(&self, method: &Method, path: &str, headers: &HeaderMap) -> RouteMatch {
        let requested = RequestedVersion::from_headers(headers);

        match self.tables.resolve(requested, method, path) {
            Ok(resolved) => {
                let version = ResolvedVersion {
                    requested,
                    served: resolved.served_version(),
                    deprecated: resolved.is_deprecated(),
                };
                RouteMatch::Found {
                    handler: resolved.handler().clone(),
                    params: resolved.into_params(),
                    version,
                }
            }
            Err(err) => RouteMatch::NotFound(err),
        }
    }

    /// The compiled tables
    pub fn tables(&self) -> &RouteTables<BoxedHandler> {
        &self.tables
    }

    /// Effective routes per version
    pub fn group_by_version(
        &self,
    ) -> std::collections::BTreeMap<ApiVersion, Vec<&RouteDeclaration<BoxedHandler>>> {
        self.tables.group_by_version()
    }

    pub(crate) fn state_ref(&self) -> Arc<Extensions> {
        self.state.clone()
    }
}

impl std::fmt::Debug for VersionedRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedRouter")
            .field("tables", &self.tables)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Routes;
    use http::header::ACCEPT;
    use http::HeaderValue;

    async fn handler() -> &'static str {
        "ok"
    }

    fn router() -> VersionedRouter {
        let tables = Routes::new()
            .version(1, |v| v.get("/items/:id", handler).deprecated(|d| d.get("/old", handler)))
            .version(2, |v| v.get("/items/{item}", handler))
            .get("/health", handler)
            .into_route_set()
            .compile()
            .unwrap();
        VersionedRouter::new(tables, Extensions::new())
    }

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_match_records_versions_and_params() {
        let router = router();

        match router.match_route(&Method::GET, "/items/9", &accept("application/json; version=5")) {
            RouteMatch::Found { params, version, .. } => {
                assert_eq!(params.get("item").map(String::as_str), Some("9"));
                assert_eq!(version.requested, RequestedVersion::Explicit(ApiVersion::new(5)));
                assert_eq!(version.served, ApiVersion::v2());
                assert!(!version.deprecated);
            }
            RouteMatch::NotFound(err) => panic!("unexpected miss: {}", err),
        }
    }

    #[test]
    fn test_match_without_accept_uses_default_policy() {
        let router = router();
        let headers = HeaderMap::new();

        match router.match_route(&Method::GET, "/old", &headers) {
            RouteMatch::Found { version, .. } => {
                assert_eq!(version.requested, RequestedVersion::Default);
                assert!(version.deprecated);
            }
            RouteMatch::NotFound(err) => panic!("unexpected miss: {}", err),
        }

        match router.match_route(&Method::GET, "/health", &headers) {
            RouteMatch::Found { version, .. } => assert_eq!(version.served, ApiVersion::GLOBAL),
            RouteMatch::NotFound(err) => panic!("unexpected miss: {}", err),
        }
    }

    #[test]
    fn test_unknown_method_is_not_found() {
        let router = router();
        assert!(matches!(
            router.match_route(&Method::DELETE, "/items/1", &HeaderMap::new()),
            RouteMatch::NotFound(_)
        ));
    }

    #[test]
    fn test_resolved_version_serializes() {
        let version = ResolvedVersion {
            requested: RequestedVersion::Default,
            served: ApiVersion::v1(),
            deprecated: true,
        };
        let json = serde_json::to_value(version).unwrap();
        assert!(json["requested"].is_null());
        assert_eq!(json["served"], 1);
        assert_eq!(json["deprecated"], true);
    }
}
