//! Deprecation signalling
//!
//! A handler (or the dispatch layer, for routes declared deprecated) marks a
//! response with [`DeprecatedEndpoint`]; on the way out the marker is turned
//! into the `X-Deprecated-Endpoint` header. Responses without the marker are
//! left untouched.

use http::header::{HeaderName, HeaderValue};
use http::{Extensions, HeaderMap};

/// Name of the deprecation response header
pub const DEPRECATION_HEADER: HeaderName = HeaderName::from_static("x-deprecated-endpoint");

/// Fixed value of the deprecation response header
pub const DEPRECATION_MESSAGE: &str = "This endpoint will be removed in an upcoming api version.";

/// Marker stored in request or response extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeprecatedEndpoint;

impl DeprecatedEndpoint {
    /// Store the marker
    pub fn mark(extensions: &mut Extensions) {
        extensions.insert(Self);
    }

    /// Whether the marker is present
    pub fn is_marked(extensions: &Extensions) -> bool {
        extensions.get::<Self>().is_some()
    }
}

/// Insert the deprecation header when `flagged`
///
/// Other headers are kept; an existing deprecation header is replaced.
pub fn emit(headers: &mut HeaderMap, flagged: bool) {
    if flagged {
        headers.insert(DEPRECATION_HEADER, HeaderValue::from_static(DEPRECATION_MESSAGE));
    }
}

/// Insert the deprecation header when `extensions` carry the marker
pub fn emit_for(headers: &mut HeaderMap, extensions: &Extensions) {
    emit(headers, DeprecatedEndpoint::is_marked(extensions));
}
