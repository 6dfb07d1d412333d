//! Route table benchmarks
//!
//! Measures compiling versioned declarations into per-version tables and
//! resolving requests against them.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;
use verroute_versioning::{RequestedVersion, RouteSet};

/// `versions` versions, each overriding every tenth resource of the one before
fn route_set(versions: u32, resources: usize) -> RouteSet<usize> {
    let mut set = RouteSet::new().version(1, |mut v| {
        for i in 0..resources {
            v = v
                .get(&format!("/r{}/:id", i), i)
                .post(&format!("/r{}", i), i);
        }
        v
    });

    for version in 2..=versions {
        set = set.version(version, |mut v| {
            for i in (0..resources).step_by(10) {
                v = v.get(&format!("/r{}/{{other}}", i), i + version as usize * 1000);
            }
            v.removed(|r| r.post(&format!("/r{}", version), 0))
        });
    }

    set.get("/health", usize::MAX)
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for versions in [1u32, 5, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(versions), &versions, |b, &n| {
            b.iter(|| route_set(n, 100).compile().unwrap())
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let tables = route_set(20, 100).compile().unwrap();
    let mut group = c.benchmark_group("resolve");

    group.bench_function("override_hit", |b| {
        let requested = RequestedVersion::from_accept("application/json; version=20");
        b.iter(|| {
            tables
                .resolve(black_box(requested), &Method::GET, black_box("/r40/123"))
                .unwrap()
                .served_version()
        })
    });

    group.bench_function("inherited_from_v1", |b| {
        let requested = RequestedVersion::from_accept("application/json; version=20");
        b.iter(|| {
            tables
                .resolve(black_box(requested), &Method::GET, black_box("/r41/123"))
                .unwrap()
                .served_version()
        })
    });

    group.bench_function("global_fallback", |b| {
        b.iter(|| {
            tables
                .resolve(RequestedVersion::Default, &Method::GET, black_box("/health"))
                .unwrap()
                .served_version()
        })
    });

    group.bench_function("miss", |b| {
        let requested = RequestedVersion::from_accept("application/json; version=7");
        b.iter(|| {
            tables
                .resolve(black_box(requested), &Method::GET, black_box("/nowhere/1"))
                .is_err()
        })
    });

    group.finish();
}

fn bench_accept_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("accept");

    group.bench_function("with_token", |b| {
        b.iter(|| RequestedVersion::from_accept(black_box("application/json; charset=utf-8; version=12")))
    });

    group.bench_function("without_token", |b| {
        b.iter(|| RequestedVersion::from_accept(black_box("text/html,application/xhtml+xml")))
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_resolve, bench_accept_parsing);
criterion_main!(benches);
