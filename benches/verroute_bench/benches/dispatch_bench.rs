//! Full request dispatch benchmarks
//!
//! Runs requests through version selection, the middleware stack and the
//! handler using the in-process test client.

use criterion::{criterion_group, criterion_main, Criterion};
use verroute_core::{Deprecated, PathParams, TestClient, TestRequest, TracingLayer, VersionedApi};

async fn show(params: PathParams) -> String {
    params.get("id").unwrap_or_default().to_string()
}

async fn legacy() -> Deprecated<&'static str> {
    Deprecated("legacy")
}

fn client() -> TestClient {
    TestClient::new(
        VersionedApi::new()
            .layer(TracingLayer::new())
            .version(1, |v| v.get("/users/:id", show).get("/legacy", legacy))
            .version(3, |v| v.get("/users/{user}", show)),
    )
}

fn bench_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let client = client();
    let mut group = c.benchmark_group("dispatch");

    group.bench_function("versioned_hit", |b| {
        b.iter(|| {
            runtime.block_on(client.request(TestRequest::get("/users/42").accept_version(2)))
        })
    });

    group.bench_function("deprecated_header", |b| {
        b.iter(|| runtime.block_on(client.get("/legacy")))
    });

    group.bench_function("not_found", |b| {
        b.iter(|| runtime.block_on(client.get_versioned("/missing", 5)))
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
