//! Requested version extraction and route eligibility
//!
//! Callers request a version through a `version=<n>` token anywhere in the
//! `Accept` header, e.g. `Accept: application/json; version=2`. Requests
//! without a usable token fall under the default-version policy, which only
//! admits version 1 routes.

use crate::version::ApiVersion;
use http::header::ACCEPT;
use http::HeaderMap;
use std::collections::BTreeMap;
use std::fmt;

/// Accept value assumed when the header is absent
pub const DEFAULT_ACCEPT: &str = "*/*";

const VERSION_TOKEN: &str = "version=";

/// The version a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestedVersion {
    /// A `version=<n>` token was found
    Explicit(ApiVersion),
    /// No usable token; only version 1 routes are eligible
    #[default]
    Default,
}

impl RequestedVersion {
    /// Parse the requested version from an `Accept` header value
    pub fn from_accept(accept: &str) -> Self {
        match extract_version_token(accept) {
            Some(version) => Self::Explicit(version),
            None => Self::Default,
        }
    }

    /// Parse the requested version from request headers
    ///
    /// Every `Accept` value is searched in order; the first one carrying a
    /// token wins. Values that are not valid UTF-8 are skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(Self::from_accept)
            .find(|requested| matches!(requested, Self::Explicit(_)))
            .unwrap_or_else(|| Self::from_accept(DEFAULT_ACCEPT))
    }

    /// Whether a route declared at `route_version` may serve this request
    ///
    /// Global routes (version 0) are never checked through this predicate.
    pub fn is_eligible(&self, route_version: ApiVersion) -> bool {
        match self {
            Self::Explicit(requested) => route_version <= *requested,
            Self::Default => route_version == ApiVersion::v1(),
        }
    }

    /// Pick the numbered table that serves this request
    ///
    /// For an explicit request that is the highest known version not above
    /// the requested one. The default policy only ever selects version 1.
    pub fn select<'a, T>(
        &self,
        tables: &'a BTreeMap<ApiVersion, T>,
    ) -> Option<(ApiVersion, &'a T)> {
        match self {
            Self::Explicit(requested) if *requested >= ApiVersion::v1() => tables
                .range(ApiVersion::v1()..=*requested)
                .next_back()
                .map(|(version, table)| (*version, table)),
            Self::Explicit(_) => None,
            Self::Default => tables
                .get_key_value(&ApiVersion::v1())
                .map(|(version, table)| (*version, table)),
        }
    }

    /// The explicit version, if any
    pub fn explicit(&self) -> Option<ApiVersion> {
        match self {
            Self::Explicit(version) => Some(*version),
            Self::Default => None,
        }
    }
}

impl fmt::Display for RequestedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(version) => write!(f, "{}", version),
            Self::Default => f.write_str("default"),
        }
    }
}

/// Find the first `version=` followed by digits and parse the digit run
///
/// Runs longer than `u32` saturate instead of failing.
fn extract_version_token(accept: &str) -> Option<ApiVersion> {
    accept.match_indices(VERSION_TOKEN).find_map(|(start, _)| {
        let rest = &accept[start + VERSION_TOKEN.len()..];
        let digits: Vec<u32> = rest
            .chars()
            .map_while(|c| c.to_digit(10))
            .collect();

        if digits.is_empty() {
            return None;
        }

        let number = digits
            .into_iter()
            .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d));
        Some(ApiVersion::new(number))
    })
}
