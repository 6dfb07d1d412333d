//! Declaration front end
//!
//! [`RouteSet`] collects route declarations through nested version blocks and
//! produces the ordered declaration list the table builder consumes.
//!
//! ```
//! use verroute_versioning::{ApiVersion, RequestedVersion, RouteSet};
//! use http::Method;
//!
//! let tables = RouteSet::new()
//!     .version(2, |v| v
//!         .get("/a_path_in_v2", "a_path_in_v2")
//!         .removed(|r| r.get("/another_path_in_v1", "removed")))
//!     .version(1, |v| v
//!         .get("/another_path_in_v1", "another_path_in_v1")
//!         .deprecated(|d| d.get("/deprecated", "deprecated")))
//!     .get("/final_fallback", "final_fallback")
//!     .compile()
//!     .unwrap();
//!
//! let v3 = RequestedVersion::Explicit(ApiVersion::v3());
//! assert!(tables.resolve(v3, &Method::GET, "/another_path_in_v1").is_err());
//! assert!(tables.resolve(v3, &Method::GET, "/deprecated").unwrap().is_deprecated());
//! ```

use crate::declaration::RouteDeclaration;
use crate::error::Result;
use crate::shape::PathShape;
use crate::table::RouteTables;
use crate::version::ApiVersion;
use http::Method;

struct Entry<H> {
    version: ApiVersion,
    method: Method,
    path: String,
    removed: bool,
    deprecated: bool,
    handler: H,
}

/// Route declarations collected in declaration order
///
/// Routes added directly on the set are global (version 0).
pub struct RouteSet<H> {
    entries: Vec<Entry<H>>,
}

impl<H> Default for RouteSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteSet<H> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Open a version block
    pub fn version<F>(mut self, version: u32, block: F) -> Self
    where
        F: FnOnce(Scope<H>) -> Scope<H>,
    {
        let scope = block(Scope::new(ApiVersion::new(version)));
        self.entries.extend(scope.entries);
        self
    }

    /// Declare a global route
    pub fn on(mut self, method: Method, path: &str, handler: H) -> Self {
        self.entries.push(Entry {
            version: ApiVersion::GLOBAL,
            method,
            path: path.to_string(),
            removed: false,
            deprecated: false,
            handler,
        });
        self
    }

    pub fn get(self, path: &str, handler: H) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: H) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: H) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: H) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: H) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Append another set's declarations after this one's
    pub fn merge(mut self, other: RouteSet<H>) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokenize every path and number the declarations
    pub fn declarations(self) -> Result<Vec<RouteDeclaration<H>>> {
        self.entries
            .into_iter()
            .enumerate()
            .map(|(order, entry)| {
                let path = PathShape::parse(&entry.path)?;
                let mut declaration =
                    RouteDeclaration::new(entry.version, entry.method, path, entry.handler)
                        .with_order(order);
                if entry.removed {
                    declaration = declaration.removed();
                }
                if entry.deprecated {
                    declaration = declaration.deprecated();
                }
                Ok(declaration)
            })
            .collect()
    }

    /// Tokenize and compile into route tables
    pub fn compile(self) -> Result<RouteTables<H>> {
        RouteTables::compile(self.declarations()?)
    }
}

/// Routes declared inside a version block
pub struct Scope<H> {
    version: ApiVersion,
    removed: bool,
    deprecated: bool,
    entries: Vec<Entry<H>>,
}

impl<H> Scope<H> {
    fn new(version: ApiVersion) -> Self {
        Self {
            version,
            removed: false,
            deprecated: false,
            entries: Vec::new(),
        }
    }

    fn nested(&self) -> Self {
        Self {
            version: self.version,
            removed: self.removed,
            deprecated: self.deprecated,
            entries: Vec::new(),
        }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// Declare a route in this block
    pub fn on(mut self, method: Method, path: &str, handler: H) -> Self {
        self.entries.push(Entry {
            version: self.version,
            method,
            path: path.to_string(),
            removed: self.removed,
            deprecated: self.deprecated,
            handler,
        });
        self
    }

    pub fn get(self, path: &str, handler: H) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: H) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: H) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: H) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: H) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Routes in `block` are removed from this version onwards
    ///
    /// The handler of a removed route is never invoked.
    pub fn removed<F>(mut self, block: F) -> Self
    where
        F: FnOnce(Scope<H>) -> Scope<H>,
    {
        let mut inner = self.nested();
        inner.removed = true;
        self.entries.extend(block(inner).entries);
        self
    }

    /// Routes in `block` answer with the deprecation header
    pub fn deprecated<F>(mut self, block: F) -> Self
    where
        F: FnOnce(Scope<H>) -> Scope<H>,
    {
        let mut inner = self.nested();
        inner.deprecated = true;
        self.entries.extend(block(inner).entries);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::predicate::RequestedVersion;

    #[test]
    fn test_declarations_keep_call_order() {
        let declarations = RouteSet::new()
            .version(2, |v| v.get("/b", "b").post("/b", "b-post"))
            .version(1, |v| v.get("/a", "a"))
            .get("/global", "global")
            .declarations()
            .unwrap();

        let summary: Vec<(u32, String, usize)> = declarations
            .iter()
            .map(|d| (d.version().number(), d.to_string(), d.order()))
            .collect();

        assert_eq!(summary[0], (2, "GET /b (v2)".to_string(), 0));
        assert_eq!(summary[1], (2, "POST /b (v2)".to_string(), 1));
        assert_eq!(summary[2], (1, "GET /a (v1)".to_string(), 2));
        assert_eq!(summary[3], (0, "GET /global (v0)".to_string(), 3));
    }

    #[test]
    fn test_nested_blocks_combine_flags() {
        let declarations = RouteSet::new()
            .version(3, |v| {
                v.deprecated(|d| d.get("/old", "old").removed(|r| r.delete("/older", "older")))
            })
            .declarations()
            .unwrap();

        assert!(declarations[0].is_deprecated());
        assert!(!declarations[0].is_removed());
        assert!(declarations[1].is_deprecated());
        assert!(declarations[1].is_removed());
        assert_eq!(declarations[1].method(), &Method::DELETE);
        assert_eq!(declarations[1].version(), ApiVersion::v3());
    }

    #[test]
    fn test_invalid_path_fails_compile() {
        let err = RouteSet::new()
            .version(1, |v| v.get("no-slash", ()))
            .compile()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidPath(_)));
    }

    #[test]
    fn test_removed_global_fails_compile() {
        let err = RouteSet::new()
            .version(0, |v| v.removed(|r| r.get("/x", ())))
            .compile()
            .unwrap_err();
        assert!(matches!(err, BuildError::GlobalRemoval { .. }));
    }

    #[test]
    fn test_merge_appends() {
        let set = RouteSet::new()
            .version(1, |v| v.get("/a", 1))
            .merge(RouteSet::new().version(1, |v| v.get("/a", 2)));
        assert_eq!(set.len(), 2);

        let tables = set.compile().unwrap();
        let resolved = tables
            .resolve(RequestedVersion::Default, &Method::GET, "/a")
            .unwrap();
        assert_eq!(*resolved.handler(), 2);
    }

    #[test]
    fn test_all_method_helpers() {
        let declarations = RouteSet::new()
            .put("/r", ())
            .patch("/r", ())
            .delete("/r", ())
            .post("/r", ())
            .version(1, |v| v.put("/r", ()).patch("/r", ()))
            .declarations()
            .unwrap();

        let methods: Vec<&Method> = declarations.iter().map(|d| d.method()).collect();
        assert_eq!(
            methods,
            vec![
                &Method::PUT,
                &Method::PATCH,
                &Method::DELETE,
                &Method::POST,
                &Method::PUT,
                &Method::PATCH,
            ]
        );
    }
}
