//! HTTP server implementation

use crate::error::ApiError;
use crate::middleware::{BoxedNext, LayerStack};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::{RouteMatch, VersionedRouter};
use bytes::Bytes;
use http::request::Parts;
use http::StatusCode;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use verroute_versioning::ResolveError;

/// Internal server struct
pub(crate) struct Server {
    router: Arc<VersionedRouter>,
    layers: Arc<LayerStack>,
}

impl Server {
    pub fn new(router: VersionedRouter, layers: LayerStack) -> Self {
        Self {
            router: Arc::new(router),
            layers: Arc::new(layers),
        }
    }

    /// Serve until the listener fails
    pub async fn run(self, addr: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.run_until(addr, std::future::pending()).await
    }

    /// Serve until `shutdown` completes
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn run_until<F>(
        self,
        addr: &str,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send,
    {
        let addr: SocketAddr = addr.parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!(%addr, "verroute server listening");

        tokio::pin!(shutdown);
        loop {
            let (stream, remote_addr) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = &mut shutdown => {
                    info!("shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
            };
            let io = TokioIo::new(stream);
            let router = self.router.clone();
            let layers = self.layers.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<Incoming>| {
                    let router = router.clone();
                    let layers = layers.clone();
                    async move {
                        let (parts, body) = req.into_parts();
                        let response = match body.collect().await {
                            Ok(collected) => {
                                dispatch(&router, &layers, parts, collected.to_bytes()).await
                            }
                            Err(err) => ApiError::bad_request("Failed to read request body")
                                .with_internal(err.to_string())
                                .into_response(),
                        };
                        Ok::<_, Infallible>(response)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!(%remote_addr, "Connection error: {}", err);
                }
            });
        }
    }
}

/// Resolve and run a single request
///
/// Shared by the server and the test client.
pub(crate) async fn dispatch(
    router: &VersionedRouter,
    layers: &LayerStack,
    parts: Parts,
    body: Bytes,
) -> Response {
    let method = parts.method.clone();
    let path = parts.uri.path().to_string();
    let start = Instant::now();

    let (handler, params, version) = match router.match_route(&method, &path, &parts.headers) {
        RouteMatch::Found {
            handler,
            params,
            version,
        } => (handler, params, version),
        RouteMatch::NotFound(err) => {
            let ResolveError::NotFound { requested, .. } = &err;
            let requested = requested.to_string();
            let response = ApiError::from(err).into_response();
            log_request(&method, &path, &requested, response.status(), start);
            return response;
        }
    };

    let request = Request::resolved(parts, body, router.state_ref(), version, params);
    let final_handler: BoxedNext = handler;

    let response = layers.execute(request, final_handler).await;

    log_request(
        &method,
        &path,
        &version.requested.to_string(),
        response.status(),
        start,
    );
    response
}

/// Log request completion
fn log_request(method: &http::Method, path: &str, requested: &str, status: StatusCode, start: Instant) {
    let elapsed = start.elapsed();

    if status.is_success() {
        info!(
            method = %method,
            path = %path,
            requested_version = %requested,
            status = %status.as_u16(),
            duration_ms = %elapsed.as_millis(),
            "Request completed"
        );
    } else {
        warn!(
            method = %method,
            path = %path,
            requested_version = %requested,
            status = %status.as_u16(),
            duration_ms = %elapsed.as_millis(),
            "Request failed"
        );
    }
}
