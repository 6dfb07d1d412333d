//! Middleware for versioned APIs
//!
//! Layers are added with `VersionedApi::layer` and wrap every resolved
//! handler. The [`DeprecationLayer`] is always installed outermost.

mod deprecation;
pub(crate) mod layer;
mod tracing_layer;

pub use deprecation::DeprecationLayer;
pub use layer::{BoxedNext, LayerStack, MiddlewareLayer};
pub use tracing_layer::TracingLayer;
