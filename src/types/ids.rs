//! Newtype wrapper for candidate identifiers.
//!
//! A `Version` is whatever the caller uses to name a build ("12.0.0",
//! "nightly-2024-01-15", a commit hash). The bisector never parses it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque candidate version identifier.
///
/// Unique within one candidate list, but not required to be globally unique
/// or comparable: ordering comes from the list, never from the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(pub String);

impl Version {
    /// Creates a new Version from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Version(s.into())
    }

    /// Returns the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the version without a leading `v`, if it has one.
    ///
    /// Release tags are conventionally `v1.2.3`; URLs add the prefix back.
    pub fn bare(&self) -> &str {
        self.0.strip_prefix('v').unwrap_or(&self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Version(s)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version(s.to_string())
    }
}
