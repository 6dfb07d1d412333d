//! TestClient for integration testing without network binding
//!
//! Requests go through the same resolution, middleware and handler path as
//! the server, without opening a socket.
//!
//! ```rust,ignore
//! use verroute_core::{TestClient, TestRequest, VersionedApi};
//!
//! #[tokio::test]
//! async fn test_cascade() {
//!     let app = VersionedApi::new()
//!         .version(1, |v| v.get("/a_path_in_v1", handler));
//!     let client = TestClient::new(app);
//!
//!     client
//!         .request(TestRequest::get("/a_path_in_v1").accept_version(3))
//!         .await
//!         .assert_status(200);
//! }
//! ```

use crate::app::VersionedApi;
use crate::middleware::LayerStack;
use crate::response::Response;
use crate::router::VersionedRouter;
use crate::server::dispatch;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use http_body_util::BodyExt;
use serde::{de::DeserializeOwned, Serialize};
use verroute_versioning::BuildError;

/// Test client for integration testing without network binding
pub struct TestClient {
    router: VersionedRouter,
    layers: LayerStack,
}

impl TestClient {
    /// Build the app and wrap it
    ///
    /// # Panics
    ///
    /// Panics if the route tables fail to compile; use [`TestClient::try_new`]
    /// to inspect the error instead.
    pub fn new(app: VersionedApi) -> Self {
        match Self::try_new(app) {
            Ok(client) => client,
            Err(err) => panic!("failed to build versioned API: {}", err),
        }
    }

    /// Build the app and wrap it
    pub fn try_new(app: VersionedApi) -> Result<Self, BuildError> {
        let (router, layers) = app.build()?;
        Ok(Self { router, layers })
    }

    /// The router the client dispatches to
    pub fn router(&self) -> &VersionedRouter {
        &self.router
    }

    /// Send a GET request without an `Accept` header
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(TestRequest::get(path)).await
    }

    /// Send a GET request asking for `version`
    pub async fn get_versioned(&self, path: &str, version: u32) -> TestResponse {
        self.request(TestRequest::get(path).accept_version(version)).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> TestResponse {
        self.request(TestRequest::post(path).json(body)).await
    }

    /// Send a request with full control
    pub async fn request(&self, req: TestRequest) -> TestResponse {
        let mut builder = http::Request::builder().method(req.method).uri(req.path.as_str());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(req.headers);
        }

        let parts = match builder.body(()) {
            Ok(request) => request.into_parts().0,
            Err(err) => panic!("invalid test request {}: {}", req.path, err),
        };

        let response = dispatch(
            &self.router,
            &self.layers,
            parts,
            req.body.unwrap_or_default(),
        )
        .await;

        TestResponse::from_response(response).await
    }
}

/// Test request builder
#[derive(Debug, Clone)]
pub struct TestRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl TestRequest {
    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: &str) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Request with an arbitrary method
    pub fn method(method: Method, path: &str) -> Self {
        Self::new(method, path)
    }

    /// Add a header; invalid names or values are ignored
    pub fn header(mut self, key: &str, value: &str) -> Self {
        if let (Ok(name), Ok(val)) = (
            key.parse::<http::header::HeaderName>(),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, val);
        }
        self
    }

    /// Ask for an API version through `Accept: application/json; version=<n>`
    pub fn accept_version(self, version: u32) -> Self {
        self.header(
            header::ACCEPT.as_str(),
            &format!("application/json; version={}", version),
        )
    }

    /// Set the request body as JSON
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        if let Ok(bytes) = serde_json::to_vec(body) {
            self.body = Some(Bytes::from(bytes));
            self.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        self
    }

    /// Set the request body as raw bytes
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Test response with assertion helpers
#[derive(Debug)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    async fn from_response(response: Response) -> Self {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map(|b| b.to_bytes())
            .unwrap_or_default();

        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value as text
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body as text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status<S>(&self, expected: S) -> &Self
    where
        S: TryInto<StatusCode>,
        S::Error: std::fmt::Debug,
    {
        let expected = match expected.try_into() {
            Ok(status) => status,
            Err(err) => panic!("invalid expected status: {:?}", err),
        };
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    pub fn assert_header(&self, key: &str, expected: &str) -> &Self {
        let actual = self.header(key).unwrap_or("");
        assert_eq!(
            actual, expected,
            "Expected header '{}' to be '{}', got '{}'",
            key, expected, actual
        );
        self
    }

    /// # Panics
    ///
    /// Panics if the header is present.
    pub fn assert_no_header(&self, key: &str) -> &Self {
        assert!(
            self.headers.get(key).is_none(),
            "Expected no '{}' header, got '{}'",
            key,
            self.header(key).unwrap_or("<binary>")
        );
        self
    }

    /// # Panics
    ///
    /// Panics if the body doesn't contain `expected`.
    pub fn assert_body_contains(&self, expected: &str) -> &Self {
        let body = self.text();
        assert!(
            body.contains(expected),
            "Expected body to contain '{}', got '{}'",
            expected,
            body
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Json, PathParams, State, Version};
    use crate::middleware::TracingLayer;
    use crate::response::Deprecated;
    use serde::Deserialize;
    use verroute_versioning::DEPRECATION_MESSAGE;

    async fn hello() -> &'static str {
        "hello"
    }

    async fn served(Version(version): Version) -> String {
        format!("{}", version.served)
    }

    async fn show(params: PathParams) -> String {
        format!("{}:{}", params.get("user").unwrap_or("-"), params.get("post").unwrap_or("-"))
    }

    async fn legacy() -> Deprecated<&'static str> {
        Deprecated("legacy")
    }

    #[derive(Clone)]
    struct AppName(&'static str);

    async fn name(State(app): State<AppName>) -> &'static str {
        app.0
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Echo {
        value: u32,
    }

    async fn echo(Json(body): Json<Echo>) -> Json<Echo> {
        Json(Echo { value: body.value + 1 })
    }

    fn app() -> VersionedApi {
        VersionedApi::new()
            .layer(TracingLayer::new())
            .state(AppName("tests"))
            .version(1, |v| {
                v.get("/hello", hello)
                    .get("/served", served)
                    .get("/users/:user/posts/:post", show)
                    .get("/legacy", legacy)
                    .post("/echo", echo)
            })
            .version(2, |v| v.get("/served", served))
            .get("/name", name)
    }

    #[tokio::test]
    async fn test_default_request_resolves_v1() {
        let client = TestClient::new(app());
        let response = client.get("/hello").await;
        response.assert_status(200);
        assert_eq!(response.text(), "hello");
        response.assert_no_header("x-deprecated-endpoint");
    }

    #[tokio::test]
    async fn test_version_extractor_sees_served_table() {
        let client = TestClient::new(app());
        assert_eq!(client.get("/served").await.text(), "v1");
        assert_eq!(client.get_versioned("/served", 2).await.text(), "v2");
        assert_eq!(client.get_versioned("/served", 9).await.text(), "v2");
    }

    #[tokio::test]
    async fn test_params_reach_handler() {
        let client = TestClient::new(app());
        let response = client.get_versioned("/users/7/posts/9", 1).await;
        assert_eq!(response.text(), "7:9");
    }

    #[tokio::test]
    async fn test_handler_can_flag_deprecation() {
        let client = TestClient::new(app());
        client
            .get("/legacy")
            .await
            .assert_status(200)
            .assert_header("x-deprecated-endpoint", DEPRECATION_MESSAGE);
    }

    #[tokio::test]
    async fn test_state_and_json() {
        let client = TestClient::new(app());
        assert_eq!(client.get("/name").await.text(), "tests");

        let response = client.post_json("/echo", &Echo { value: 1 }).await;
        response.assert_status(200);
        assert_eq!(response.json::<Echo>().unwrap(), Echo { value: 2 });
    }

    #[tokio::test]
    async fn test_miss_is_json_not_found() {
        let client = TestClient::new(app());
        let response = client.get_versioned("/nowhere", 2).await;
        response
            .assert_status(StatusCode::NOT_FOUND)
            .assert_header("content-type", "application/json")
            .assert_body_contains("\"type\":\"not_found\"");
    }

    #[test]
    fn test_try_new_reports_build_errors() {
        let result = TestClient::try_new(VersionedApi::new().version(1, |v| v.get("/{", hello)));
        assert!(matches!(result, Err(BuildError::InvalidPath(_))));
    }
}
