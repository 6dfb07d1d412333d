//! Route declarations and their table keys

use crate::shape::{PathShape, ShapeKey};
use crate::version::ApiVersion;
use http::Method;
use serde::Serialize;
use std::fmt;

/// A single version-scoped mapping from method and path to a handler
///
/// Declarations are immutable once created. `H` is whatever the dispatch
/// layer uses to reference handlers.
#[derive(Debug, Clone)]
pub struct RouteDeclaration<H> {
    version: ApiVersion,
    method: Method,
    path: PathShape,
    removed: bool,
    deprecated: bool,
    handler: H,
    order: usize,
}

impl<H> RouteDeclaration<H> {
    /// Declare a route at `version`
    pub fn new(version: ApiVersion, method: Method, path: PathShape, handler: H) -> Self {
        Self {
            version,
            method,
            path,
            removed: false,
            deprecated: false,
            handler,
            order: 0,
        }
    }

    /// Declare a global route (version 0)
    pub fn global(method: Method, path: PathShape, handler: H) -> Self {
        Self::new(ApiVersion::GLOBAL, method, path, handler)
    }

    /// Mark the route as removed from this version onwards
    pub fn removed(mut self) -> Self {
        self.removed = true;
        self
    }

    /// Mark the route as deprecated
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub(crate) fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &PathShape {
        &self.path
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Position in the compiled input, stable across builds of the same list
    pub fn order(&self) -> usize {
        self.order
    }

    /// The key this declaration occupies in a version's table
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.path.normalize(), self.method.clone())
    }

    /// Handler-free view used for reports
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            version: self.version,
            method: self.method.to_string(),
            path: self.path.to_string(),
            removed: self.removed,
            deprecated: self.deprecated,
            order: self.order,
        }
    }
}

impl<H> fmt::Display for RouteDeclaration<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.method, self.path, self.version)?;
        if self.removed {
            f.write_str(" [removed]")?;
        }
        if self.deprecated {
            f.write_str(" [deprecated]")?;
        }
        Ok(())
    }
}

/// Uniqueness key inside one version's table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub shape: ShapeKey,
    pub method: Method,
}

impl RouteKey {
    pub fn new(shape: ShapeKey, method: Method) -> Self {
        Self { shape, method }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.shape)
    }
}

/// Serializable description of a declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub version: ApiVersion,
    pub method: String,
    pub path: String,
    pub removed: bool,
    pub deprecated: bool,
    pub order: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_variable_names_but_not_method() {
        let a = RouteDeclaration::new(
            ApiVersion::v1(),
            Method::GET,
            PathShape::parse("/users/:id").unwrap(),
            "a",
        );
        let b = RouteDeclaration::new(
            ApiVersion::v2(),
            Method::GET,
            PathShape::parse("/users/{user_id}").unwrap(),
            "b",
        );
        let c = RouteDeclaration::new(
            ApiVersion::v1(),
            Method::POST,
            PathShape::parse("/users/:id").unwrap(),
            "c",
        );

        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_display() {
        let decl = RouteDeclaration::new(
            ApiVersion::v2(),
            Method::GET,
            PathShape::parse("/another").unwrap(),
            (),
        )
        .removed();
        assert_eq!(decl.to_string(), "GET /another (v2) [removed]");
        assert_eq!(decl.key().to_string(), "GET /another");
    }

    #[test]
    fn test_summary_serializes() {
        let decl = RouteDeclaration::global(Method::GET, PathShape::parse("/final").unwrap(), ())
            .deprecated();
        let json = serde_json::to_value(decl.summary()).unwrap();
        assert_eq!(json["version"], 0);
        assert_eq!(json["method"], "GET");
        assert_eq!(json["path"], "/final");
        assert_eq!(json["deprecated"], true);
    }
}
