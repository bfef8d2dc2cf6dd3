use crate::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three-part identity under which an artifact is published.
///
/// Immutable once constructed; the display form is `group:artifact:version`,
/// which is also the line format of the run manifest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    /// Build a coordinate, rejecting empty artifact or version values.
    ///
    /// The group is taken as-is; an empty group would be a configuration
    /// error caught before any coordinate is built.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let artifact = artifact.into();
        if artifact.trim().is_empty() {
            return Err(IdentityError::EmptyArtifact);
        }
        let version = version.into();
        if version.trim().is_empty() {
            return Err(IdentityError::EmptyVersion);
        }
        Ok(Self {
            group: group.into(),
            artifact,
            version,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Strip bundle directives from a symbolic name.
///
/// A symbolic name may carry `;`-separated directives such as
/// `com.example.io;singleton:=true`; the artifact identifier is the part
/// before the first separator, truncated exactly at the separator index.
pub fn strip_directives(symbolic_name: &str) -> &str {
    match symbolic_name.split_once(';') {
        Some((name, _)) => name.trim(),
        None => symbolic_name.trim(),
    }
}
