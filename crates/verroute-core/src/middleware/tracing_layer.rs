//! Tracing middleware
//!
//! Opens a span per request with method, path, requested and served API
//! version, then records status and duration once the response is ready.

use super::layer::{BoxedNext, MiddlewareLayer};
use crate::handler::BoxFuture;
use crate::request::Request;
use std::time::Instant;
use tracing::{info_span, Instrument, Level};

/// Middleware layer that creates tracing spans for requests
///
/// ```rust,ignore
/// VersionedApi::new()
///     .layer(TracingLayer::new().with_field("service", "billing"))
///     .routes(routes)
/// ```
#[derive(Clone)]
pub struct TracingLayer {
    level: Level,
    custom_fields: Vec<(String, String)>,
}

impl TracingLayer {
    /// Create a new TracingLayer with default INFO level
    pub fn new() -> Self {
        Self::with_level(Level::INFO)
    }

    /// Create a TracingLayer with a specific level for successful requests
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            custom_fields: Vec::new(),
        }
    }

    /// Add a field logged with every completed request
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.push((key.into(), value.into()));
        self
    }
}

impl Default for TracingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MiddlewareLayer for TracingLayer {
    fn call(&self, req: Request, next: BoxedNext) -> BoxFuture {
        let level = self.level;
        let method = req.method().to_string();
        let path = req.path().to_string();
        let custom_fields = self.custom_fields.clone();
        let requested = req.requested_version();
        let served = req.served_version();

        Box::pin(async move {
            let start = Instant::now();

            let span = info_span!(
                "http_request",
                method = %method,
                path = %path,
                requested_version = %requested,
                served_version = %served,
                status = tracing::field::Empty,
                duration_ms = tracing::field::Empty,
            );

            let response = next(req).instrument(span.clone()).await;

            let duration_ms = start.elapsed().as_millis() as u64;
            let status = response.status();
            span.record("status", status.as_u16());
            span.record("duration_ms", duration_ms);

            let fields = custom_fields
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(" ");

            let _enter = span.enter();
            if status.is_success() {
                match level {
                    Level::TRACE => tracing::trace!(status = status.as_u16(), duration_ms, fields = %fields, "Request completed"),
                    Level::DEBUG => tracing::debug!(status = status.as_u16(), duration_ms, fields = %fields, "Request completed"),
                    Level::INFO => tracing::info!(status = status.as_u16(), duration_ms, fields = %fields, "Request completed"),
                    Level::WARN => tracing::warn!(status = status.as_u16(), duration_ms, fields = %fields, "Request completed"),
                    Level::ERROR => tracing::error!(status = status.as_u16(), duration_ms, fields = %fields, "Request completed"),
                }
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    duration_ms,
                    fields = %fields,
                    error = true,
                    "Request failed"
                );
            }

            response
        })
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::layer::tests::{create_test_request, status_handler};
    use crate::middleware::LayerStack;
    use crate::request::tests::resolved_request;
    use http::{Method, StatusCode};

    #[tokio::test]
    async fn test_tracing_layer_passes_response_through() {
        let mut stack = LayerStack::new();
        stack.push(Box::new(
            TracingLayer::with_level(Level::DEBUG).with_field("service", "tests"),
        ));

        let req = resolved_request(Method::GET, "/items/1", 3, 2);

        let response = stack.execute(req, status_handler(StatusCode::CREATED)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let req = create_test_request(Method::GET, "/missing");
        let response = stack.execute(req, status_handler(StatusCode::NOT_FOUND)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
