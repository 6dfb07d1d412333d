//! API version numbers
//!
//! Versions are plain non-negative integers. Version `0` is reserved for
//! global routes declared outside any version scope.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A numeric API version
///
/// Supports formats like:
/// - `1`, `2`, `10` (bare number)
/// - `v1`, `V2` (with prefix)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ApiVersion(u32);

impl ApiVersion {
    /// The version of routes declared outside any version scope
    pub const GLOBAL: ApiVersion = ApiVersion(0);

    /// Highest representable version
    pub const MAX: ApiVersion = ApiVersion(u32::MAX);

    /// Create a new version
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Create version 1
    pub const fn v1() -> Self {
        Self(1)
    }

    /// Create version 2
    pub const fn v2() -> Self {
        Self(2)
    }

    /// Create version 3
    pub const fn v3() -> Self {
        Self(3)
    }

    /// The raw version number
    pub const fn number(&self) -> u32 {
        self.0
    }

    /// Whether this is the global (versionless) version
    pub const fn is_global(&self) -> bool {
        self.0 == 0
    }

    /// Format as path segment (e.g., "v1")
    pub fn as_path_segment(&self) -> String {
        format!("v{}", self.0)
    }
}

impl From<u32> for ApiVersion {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

impl From<ApiVersion> for u32 {
    fn from(version: ApiVersion) -> Self {
        version.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }

        // Remove optional 'v' prefix
        let digits = s
            .strip_prefix('v')
            .or_else(|| s.strip_prefix('V'))
            .unwrap_or(s);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersionParseError::InvalidFormat);
        }

        digits
            .parse()
            .map(ApiVersion)
            .map_err(|_| VersionParseError::InvalidNumber)
    }
}

/// Error type for version parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    /// Number does not fit a version
    #[error("invalid number in version")]
    InvalidNumber,
    /// Not a number, with or without a `v` prefix
    #[error("invalid version format")]
    InvalidFormat,
    /// Empty version string
    #[error("empty version string")]
    Empty,
}
