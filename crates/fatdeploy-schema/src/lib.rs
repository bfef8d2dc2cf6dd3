//! Bundle metadata parsing and publish coordinate resolution for fatdeploy.
//!
//! This crate reads the embedded key/value metadata segment of a bundle
//! archive (`META-INF/MANIFEST.MF`) and derives the `group:artifact:version`
//! coordinate under which the bundle is republished.

pub mod coordinate;
pub mod metadata;

pub use coordinate::{strip_directives, Coordinate};
pub use metadata::{
    read_bundle_metadata, resolve_coordinate, BundleMetadata, METADATA_ENTRY, SYMBOLIC_NAME_KEY,
    VERSION_KEY,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to read bundle: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable bundle archive '{file}': {reason}")]
    Unreadable { file: PathBuf, reason: String },
    #[error("bundle '{0}' has no metadata entry")]
    NoMetadata(PathBuf),
    #[error("bundle metadata is missing required key '{0}'")]
    MissingKey(&'static str),
    #[error("artifact identifier is empty after stripping directives")]
    EmptyArtifact,
    #[error("version value is empty")]
    EmptyVersion,
}
