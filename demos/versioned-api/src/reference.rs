//! The reference route set
//!
//! One table of declarations feeds both the served [`Routes`] and the
//! handler-name [`RouteSet`] used by the `routes` report.

use http::Method;
use serde::Serialize;
use std::collections::BTreeMap;
use verroute::prelude::*;
use verroute::{Handler, RouteSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Live,
    Removed,
    Deprecated,
}

#[derive(Debug, Clone)]
pub struct Entry {
    /// `0` declares a global route
    pub version: u32,
    pub mark: Mark,
    pub method: Method,
    pub path: &'static str,
    pub handler: &'static str,
}

fn entry(version: u32, mark: Mark, method: Method, path: &'static str, handler: &'static str) -> Entry {
    Entry {
        version,
        mark,
        method,
        path,
        handler,
    }
}

pub fn entries() -> Vec<Entry> {
    vec![
        entry(3, Mark::Live, Method::POST, "/a_path_only_in_v3", "v3::posted_a_path_only_in_v3"),
        entry(3, Mark::Live, Method::GET, "/a_path_only_in_v3", "v3::a_path_only_in_v3"),
        entry(2, Mark::Live, Method::GET, "/a_path_overridden_from_v1/:id/whats/:ok", "v2::a_path_overridden_from_v1"),
        entry(2, Mark::Live, Method::GET, "/a_path_in_v2", "v2::a_path_in_v2"),
        entry(2, Mark::Removed, Method::GET, "/another_path_in_v1", "v1::another_path_in_v1"),
        entry(1, Mark::Live, Method::GET, "/a_path_in_v1", "v1::a_path_in_v1"),
        entry(1, Mark::Live, Method::GET, "/another_path_in_v1", "v1::another_path_in_v1"),
        entry(1, Mark::Live, Method::GET, "/a_path_overridden_from_v1/:id/whats/:ok", "v1::a_path_overridden_from_v1"),
        entry(1, Mark::Deprecated, Method::GET, "/a_path_in_v1_deprecated", "v1::a_path_in_v1_deprecated"),
        entry(0, Mark::Live, Method::GET, "/final_fallback", "final_fallback"),
    ]
}

/// Body of every reference handler
#[derive(Debug, Serialize)]
pub struct Served {
    pub handler: &'static str,
    pub requested: Option<u32>,
    pub served: ApiVersion,
    pub params: BTreeMap<String, String>,
}

fn respond(name: &'static str) -> impl Handler<(Version, PathParams)> {
    move |Version(version): Version, PathParams(params): PathParams| async move {
        Json(Served {
            handler: name,
            requested: version.requested.explicit().map(|v| v.number()),
            served: version.served,
            params: params.into_iter().collect(),
        })
    }
}

/// The reference routes with live handlers
pub fn routes() -> Routes {
    entries().into_iter().fold(Routes::new(), |routes, e| {
        if e.version == 0 {
            return routes.on(e.method, e.path, respond(e.handler));
        }
        routes.version(e.version, |v| match e.mark {
            Mark::Live => v.on(e.method, e.path, respond(e.handler)),
            Mark::Removed => v.removed(|r| r.on(e.method, e.path, respond(e.handler))),
            Mark::Deprecated => v.deprecated(|d| d.on(e.method, e.path, respond(e.handler))),
        })
    })
}

/// The reference routes with handler names in place of handlers
pub fn named_routes() -> RouteSet<&'static str> {
    entries().into_iter().fold(RouteSet::new(), |routes, e| {
        if e.version == 0 {
            return routes.on(e.method, e.path, e.handler);
        }
        routes.version(e.version, |v| match e.mark {
            Mark::Live => v.on(e.method, e.path, e.handler),
            Mark::Removed => v.removed(|r| r.on(e.method, e.path, e.handler)),
            Mark::Deprecated => v.deprecated(|d| d.on(e.method, e.path, e.handler)),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use verroute::{TestClient, TestRequest};

    fn client() -> TestClient {
        TestClient::new(VersionedApi::new().routes(routes()))
    }

    #[tokio::test]
    async fn test_handlers_report_their_name_and_version() {
        let response = client()
            .get_versioned("/a_path_overridden_from_v1/7/whats/up", 3)
            .await;
        response.assert_status(200);

        let body: Value = response.json().unwrap();
        assert_eq!(body["handler"], "v2::a_path_overridden_from_v1");
        assert_eq!(body["requested"], 3);
        assert_eq!(body["served"], 2);
        assert_eq!(body["params"]["id"], "7");
        assert_eq!(body["params"]["ok"], "up");
    }

    #[tokio::test]
    async fn test_deprecated_and_removed_routes() {
        let client = client();

        client
            .get("/a_path_in_v1_deprecated")
            .await
            .assert_header("x-deprecated-endpoint", verroute::DEPRECATION_MESSAGE);
        client
            .get_versioned("/another_path_in_v1", 2)
            .await
            .assert_status(404);

        let response = client
            .request(TestRequest::post("/a_path_only_in_v3").accept_version(3))
            .await;
        let body: Value = response.json().unwrap();
        assert_eq!(body["handler"], "v3::posted_a_path_only_in_v3");
    }

    #[tokio::test]
    async fn test_fallback_without_accept() {
        let body: Value = client().get("/final_fallback").await.json().unwrap();
        assert_eq!(body["handler"], "final_fallback");
        assert_eq!(body["requested"], Value::Null);
        assert_eq!(body["served"], 0);
    }

    #[test]
    fn test_named_routes_match_served_routes() {
        assert_eq!(named_routes().len(), routes().len());
        assert!(named_routes().compile().is_ok());
    }
}
