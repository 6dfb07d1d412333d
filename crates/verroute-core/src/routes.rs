//! Declaring versioned routes with async handlers
//!
//! ```rust,ignore
//! use verroute_core::Routes;
//!
//! let routes = Routes::new()
//!     .version(2, |v| v
//!         .get("/a_path_in_v2", a_path_in_v2)
//!         .removed(|r| r.get("/another", removed)))
//!     .version(1, |v| v
//!         .get("/another", another)
//!         .deprecated(|d| d.get("/deprecated", deprecated)))
//!     .get("/final_fallback", final_fallback);
//! ```

use crate::handler::{BoxedHandler, Handler};
use http::Method;
use verroute_versioning::{RouteSet, Scope};

/// Versioned route declarations with type-erased handlers
pub struct Routes {
    inner: RouteSet<BoxedHandler>,
}

impl Default for Routes {
    fn default() -> Self {
        Self::new()
    }
}

impl Routes {
    pub fn new() -> Self {
        Self {
            inner: RouteSet::new(),
        }
    }

    /// Open a version block
    pub fn version<F>(self, version: u32, block: F) -> Self
    where
        F: FnOnce(VersionScope) -> VersionScope,
    {
        Self {
            inner: self
                .inner
                .version(version, |scope| block(VersionScope { inner: scope }).inner),
        }
    }

    /// Declare a global route, reachable from every requested version
    pub fn on<H, T>(self, method: Method, path: &str, handler: H) -> Self
    where
        H: Handler<T>,
        T: 'static,
    {
        Self {
            inner: self.inner.on(method, path, handler.into_boxed()),
        }
    }

    pub fn get<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Append another set of routes after these
    pub fn merge(self, other: Routes) -> Self {
        Self {
            inner: self.inner.merge(other.inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The underlying declaration set
    pub fn into_route_set(self) -> RouteSet<BoxedHandler> {
        self.inner
    }
}

/// Routes inside a version block
pub struct VersionScope {
    inner: Scope<BoxedHandler>,
}

impl VersionScope {
    pub fn on<H, T>(self, method: Method, path: &str, handler: H) -> Self
    where
        H: Handler<T>,
        T: 'static,
    {
        Self {
            inner: self.inner.on(method, path, handler.into_boxed()),
        }
    }

    pub fn get<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Routes in `block` are removed from this version onwards
    pub fn removed<F>(self, block: F) -> Self
    where
        F: FnOnce(VersionScope) -> VersionScope,
    {
        Self {
            inner: self
                .inner
                .removed(|scope| block(VersionScope { inner: scope }).inner),
        }
    }

    /// Routes in `block` answer with the deprecation header
    pub fn deprecated<F>(self, block: F) -> Self
    where
        F: FnOnce(VersionScope) -> VersionScope,
    {
        Self {
            inner: self
                .inner
                .deprecated(|scope| block(VersionScope { inner: scope }).inner),
        }
    }
}
