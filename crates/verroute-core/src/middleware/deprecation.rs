//! Deprecation header middleware
//!
//! Adds `X-Deprecated-Endpoint` to responses of deprecated endpoints. An
//! endpoint counts as deprecated when the dispatcher marked the request (the
//! resolved declaration is deprecated) or the handler marked its response
//! with [`Deprecated`](crate::response::Deprecated).

use super::layer::{BoxedNext, MiddlewareLayer};
use crate::handler::BoxFuture;
use crate::request::Request;
use verroute_versioning::deprecation::{emit, DeprecatedEndpoint};

/// Emits the deprecation header for marked requests and responses
///
/// Installed outermost by `VersionedApi`, so it sees the final response.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeprecationLayer;

impl DeprecationLayer {
    pub fn new() -> Self {
        Self
    }
}

impl MiddlewareLayer for DeprecationLayer {
    fn call(&self, req: Request, next: BoxedNext) -> BoxFuture {
        let request_marked = req.is_deprecated();

        Box::pin(async move {
            let mut response = next(req).await;
            let flagged = request_marked || DeprecatedEndpoint::is_marked(response.extensions());
            if flagged {
                tracing::debug!("deprecated endpoint served");
            }
            emit(response.headers_mut(), flagged);
            response
        })
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::layer::tests::{create_test_request, status_handler};
    use crate::middleware::LayerStack;
    use crate::response::{Deprecated, IntoResponse};
    use crate::router::ResolvedVersion;
    use bytes::Bytes;
    use http::{Extensions, Method, StatusCode};
    use std::collections::HashMap;
    use std::sync::Arc;
    use verroute_versioning::{ApiVersion, RequestedVersion, DEPRECATION_HEADER, DEPRECATION_MESSAGE};

    fn stack() -> LayerStack {
        let mut stack = LayerStack::new();
        stack.push(Box::new(DeprecationLayer::new()));
        stack
    }

    #[tokio::test]
    async fn test_marked_request_gets_header() {
        let mut req = create_test_request(Method::GET, "/deprecated");
        DeprecatedEndpoint::mark(req.extensions_mut());

        let response = stack().execute(req, status_handler(StatusCode::OK)).await;
        assert_eq!(
            response.headers().get(DEPRECATION_HEADER).unwrap(),
            DEPRECATION_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_deprecated_route_gets_header() {
        let (head, _) = http::Request::builder()
            .uri("/a_path_in_v1_deprecated")
            .body(())
            .unwrap()
            .into_parts();
        let version = ResolvedVersion {
            requested: RequestedVersion::Explicit(ApiVersion::v3()),
            served: ApiVersion::v3(),
            deprecated: true,
        };
        let req = Request::resolved(head, Bytes::new(), Arc::new(Extensions::new()), version, HashMap::new());

        let response = stack().execute(req, status_handler(StatusCode::OK)).await;
        assert_eq!(
            response.headers().get(DEPRECATION_HEADER).unwrap(),
            DEPRECATION_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_unmarked_request_is_untouched() {
        let req = create_test_request(Method::GET, "/current");
        let response = stack().execute(req, status_handler(StatusCode::OK)).await;
        assert!(response.headers().get(DEPRECATION_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_handler_marked_response_gets_header() {
        let handler: BoxedNext = Arc::new(|_req: Request| {
            Box::pin(async { Deprecated("legacy").into_response() }) as BoxFuture
        });

        let req = create_test_request(Method::GET, "/legacy");
        let response = stack().execute(req, handler).await;
        assert_eq!(
            response.headers().get("x-deprecated-endpoint").unwrap(),
            "This endpoint will be removed in an upcoming api version."
        );
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_error_responses_are_flagged_too() {
        let mut req = create_test_request(Method::GET, "/deprecated");
        DeprecatedEndpoint::mark(req.extensions_mut());

        let response = stack()
            .execute(req, status_handler(StatusCode::INTERNAL_SERVER_ERROR))
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(DEPRECATION_HEADER));
    }
}
