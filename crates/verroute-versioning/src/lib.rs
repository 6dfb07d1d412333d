//! # verroute-versioning
//!
//! Version-cascading route resolution.
//!
//! Routes are declared once per API version. Compiling the declarations
//! produces one complete table per version: a newer version inherits every
//! route of older versions unless it overrides or removes it. A request is
//! served from the table of the highest declared version not above the one
//! it asks for through `Accept: ...; version=<n>`.
//!
//! - [`RequestedVersion`] extracts the requested version and decides which
//!   routes are eligible
//! - [`PathShape`] tokenizes declared paths and normalizes them to a
//!   [`ShapeKey`] so `/:id/foo` and `/:other/foo` collide
//! - [`RouteTables`] compiles declarations and resolves requests
//! - [`deprecation`] renders the `X-Deprecated-Endpoint` response header
//! - [`RouteSet`] is the block-style declaration front end
//!
//! This crate performs no I/O. The compiled tables are immutable and can be
//! shared between request tasks behind an `Arc`.
//!
//! # Example
//!
//! ```
//! use http::Method;
//! use verroute_versioning::{RequestedVersion, RouteSet};
//!
//! let tables = RouteSet::new()
//!     .version(1, |v| v.get("/overridden/:id", "v1"))
//!     .version(2, |v| v.get("/overridden/{other}", "v2"))
//!     .compile()
//!     .unwrap();
//!
//! let requested = RequestedVersion::from_accept("application/json; version=3");
//! let route = tables.resolve(requested, &Method::GET, "/overridden/42").unwrap();
//! assert_eq!(*route.handler(), "v2");
//! assert_eq!(route.param("other"), Some("42"));
//! ```

mod declaration;
pub mod deprecation;
mod error;
mod predicate;
mod scope;
mod shape;
mod table;
mod version;


pub use declaration::{RouteDeclaration, RouteKey, RouteSummary};
pub use deprecation::{DeprecatedEndpoint, DEPRECATION_HEADER, DEPRECATION_MESSAGE};
pub use error::{BuildError, ResolveError, Result};
pub use predicate::{RequestedVersion, DEFAULT_ACCEPT};
pub use scope::{RouteSet, Scope};
pub use shape::{PathError, PathShape, PathToken, ShapeKey, ShapeSegment};
pub use table::{EffectiveRouteTable, ResolvedRoute, RouteTables, Slot};
pub use version::{ApiVersion, VersionParseError};
