//! # verroute-core
//!
//! HTTP integration for versioned route tables: the hyper server, request
//! dispatch, extractors, the middleware stack and the deprecation header.
//!
//! This crate is not meant to be used directly. Use `verroute` instead.

mod app;
mod error;
mod extract;
mod handler;
pub mod middleware;
mod request;
mod response;
mod router;
mod routes;
mod server;
#[cfg(any(test, feature = "test-utils"))]
mod test_client;

// Public API
pub use app::VersionedApi;
pub use error::{ApiError, Result};
pub use extract::{
    Body, FromRequest, FromRequestParts, Headers, Json, Path, PathParams, Query, State, Version,
};
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use middleware::{DeprecationLayer, LayerStack, MiddlewareLayer, TracingLayer};
pub use request::Request;
pub use response::{Deprecated, IntoResponse, Response};
pub use router::{ResolvedVersion, VersionedRouter};
pub use routes::{Routes, VersionScope};
#[cfg(any(test, feature = "test-utils"))]
pub use test_client::{TestClient, TestRequest, TestResponse};

// Re-export the route table crate for direct access to versions and tables
pub use verroute_versioning as versioning;
