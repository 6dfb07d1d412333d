//! VersionedApi application builder

use crate::handler::Handler;
use crate::middleware::{DeprecationLayer, LayerStack, MiddlewareLayer};
use crate::router::VersionedRouter;
use crate::routes::{Routes, VersionScope};
use crate::server::Server;
use http::{Extensions, Method};
use std::future::Future;
use tracing::info;
use verroute_versioning::BuildError;

/// Main application builder
///
/// ```rust,ignore
/// use verroute_core::VersionedApi;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     VersionedApi::new()
///         .version(1, |v| v.get("/users/:id", show_user_v1))
///         .version(2, |v| v.get("/users/:id", show_user_v2))
///         .get("/health", health)
///         .run("127.0.0.1:8080")
///         .await
/// }
/// ```
pub struct VersionedApi {
    routes: Routes,
    layers: LayerStack,
    state: Extensions,
}

impl VersionedApi {
    /// Create an application without routes
    pub fn new() -> Self {
        Self {
            routes: Routes::new(),
            layers: LayerStack::new(),
            state: Extensions::new(),
        }
    }

    /// Append a set of route declarations
    pub fn routes(mut self, routes: Routes) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    /// Declare routes of one version
    pub fn version<F>(mut self, version: u32, block: F) -> Self
    where
        F: FnOnce(VersionScope) -> VersionScope,
    {
        self.routes = self.routes.version(version, block);
        self
    }

    /// Declare a global route
    pub fn route<H, T>(mut self, method: Method, path: &str, handler: H) -> Self
    where
        H: Handler<T>,
        T: 'static,
    {
        self.routes = self.routes.on(method, path, handler);
        self
    }

    /// Declare a global GET route
    pub fn get<H: Handler<T>, T: 'static>(self, path: &str, handler: H) -> Self {
        self.route(Method::GET, path, handler)
    }

    /// Add a middleware layer
    ///
    /// Layers run in the order they are added. The deprecation layer always
    /// runs outside all of them.
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: MiddlewareLayer,
    {
        self.layers.push(Box::new(layer));
        self
    }

    /// Add application state, available to handlers through `State<T>`
    pub fn state<S>(mut self, state: S) -> Self
    where
        S: Clone + Send + Sync + 'static,
    {
        self.state.insert(state);
        self
    }

    /// Compile the route tables and finish the layer stack
    pub fn build(self) -> Result<(VersionedRouter, LayerStack), BuildError> {
        let tables = self.routes.into_route_set().compile()?;

        let mut layers = self.layers;
        layers.prepend(Box::new(DeprecationLayer::new()));

        let versions: Vec<String> = tables.versions().map(|v| v.to_string()).collect();
        info!(
            versions = %versions.join(", "),
            routes = tables.declarations().len(),
            layers = layers.len(),
            "versioned API ready"
        );

        Ok((VersionedRouter::new(tables, self.state), layers))
    }

    /// Build and serve on `addr`
    pub async fn run(self, addr: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (router, layers) = self.build()?;
        Server::new(router, layers).run(addr).await
    }

    /// Build and serve on `addr` until `shutdown` completes
    pub async fn run_until<F>(
        self,
        addr: &str,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send,
    {
        let (router, layers) = self.build()?;
        Server::new(router, layers).run_until(addr, shutdown).await
    }
}

impl Default for VersionedApi {
    fn default() -> Self {
        Self::new()
    }
}
