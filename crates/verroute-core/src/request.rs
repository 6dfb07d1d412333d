//! The request seen by middleware and handlers
//!
//! A [`Request`] is only built once routing succeeded, so it always knows
//! which version the caller asked for, which table served it, and the path
//! parameters under the serving declaration's names.

use crate::router::ResolvedVersion;
use bytes::Bytes;
use http::{request::Parts, Extensions, HeaderMap, Method, Uri};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use verroute_versioning::{ApiVersion, DeprecatedEndpoint, RequestedVersion};

pub struct Request {
    head: Parts,
    body: Option<Bytes>,
    state: Arc<Extensions>,
    version: ResolvedVersion,
    params: HashMap<String, String>,
}

impl Request {
    /// Assemble the request for a resolved route
    ///
    /// A deprecated route gets the [`DeprecatedEndpoint`] marker in its
    /// extensions, where the deprecation layer looks for it.
    pub(crate) fn resolved(
        mut head: Parts,
        body: Bytes,
        state: Arc<Extensions>,
        version: ResolvedVersion,
        params: HashMap<String, String>,
    ) -> Self {
        if version.deprecated {
            DeprecatedEndpoint::mark(&mut head.extensions);
        }

        Self {
            head,
            body: Some(body),
            state,
            version,
            params,
        }
    }

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    pub fn path(&self) -> &str {
        self.head.uri.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.head.uri.query()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    pub fn extensions(&self) -> &Extensions {
        &self.head.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.head.extensions
    }

    /// Requested and served version of the route
    pub fn version(&self) -> &ResolvedVersion {
        &self.version
    }

    pub fn requested_version(&self) -> RequestedVersion {
        self.version.requested
    }

    /// The table that served the route; `v0` for global routes
    pub fn served_version(&self) -> ApiVersion {
        self.version.served
    }

    /// Whether the route or an earlier layer flagged this request deprecated
    pub fn is_deprecated(&self) -> bool {
        self.version.deprecated || DeprecatedEndpoint::is_marked(&self.head.extensions)
    }

    /// Path parameters, keyed by the serving declaration's names
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Take the buffered body; `None` once an extractor consumed it
    pub fn take_body(&mut self) -> Option<Bytes> {
        self.body.take()
    }

    /// Application state registered with `VersionedApi::state`
    pub fn state(&self) -> &Extensions {
        &self.state
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.head.method)
            .field("uri", &self.head.uri)
            .field("requested", &self.version.requested)
            .field("served", &self.version.served)
            .field("params", &self.params)
            .finish()
    }
}
