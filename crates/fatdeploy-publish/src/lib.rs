//! Per-artifact publish collaborators for fatdeploy.
//!
//! Publishing one artifact is modeled as a [`Publisher`] trait call so the
//! pipeline stays independent of the repository mechanism: the shipped
//! implementation shells out to an install tool, and a recording mock backs
//! the tests.

pub mod install_tool;
pub mod mock;

pub use install_tool::InstallTool;
pub use mock::RecordingPublisher;

use fatdeploy_schema::Coordinate;
use std::path::PathBuf;
use thiserror::Error;

/// Packaging kind passed to the repository for bundle artifacts.
pub const BUNDLE_PACKAGING: &str = "jar";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to invoke publish tool '{tool}': {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },
    #[error("publish tool exited with status {status} for {artifact}: {stderr}")]
    ToolFailed {
        artifact: String,
        status: i32,
        stderr: String,
    },
    #[error("artifact file missing: {0}")]
    MissingFile(PathBuf),
    #[error("publish rejected: {0}")]
    Rejected(String),
}

/// One publish invocation: the resolved coordinate plus the file to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub coordinate: Coordinate,
    pub file: PathBuf,
    pub packaging: String,
    /// Whether the repository should auto-generate descriptor metadata for
    /// the artifact. Bundles carry their own metadata, so this stays off.
    pub generate_descriptor: bool,
}

impl PublishRequest {
    pub fn for_bundle(coordinate: Coordinate, file: PathBuf) -> Self {
        Self {
            coordinate,
            file,
            packaging: BUNDLE_PACKAGING.to_owned(),
            generate_descriptor: false,
        }
    }
}

/// A collaborator that installs exactly one artifact into a repository.
pub trait Publisher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Publish one artifact. Errors are per-artifact: the caller logs and
    /// continues with the rest of the batch.
    fn publish(&self, request: &PublishRequest) -> Result<(), PublishError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_request_defaults() {
        let coordinate = Coordinate::new("g", "a", "1.0").unwrap();
        let request = PublishRequest::for_bundle(coordinate, PathBuf::from("/tmp/a.jar"));
        assert_eq!(request.packaging, "jar");
        assert!(!request.generate_descriptor);
    }
}
