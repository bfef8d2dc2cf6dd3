//! Pipeline orchestration, artifact registry, and run manifest for fatdeploy.
//!
//! This crate drives the full extraction-and-republish run: unpack every
//! container found under the working directory, resolve a publish coordinate
//! for every remaining candidate, publish each registry entry through a
//! [`fatdeploy_publish::Publisher`], write the run manifest, and tear the
//! working directory down. Per-file failures are contained and reported;
//! only missing inputs, manifest-write failure, and cleanup failure abort
//! a run.

pub mod config;
pub mod lock;
pub mod manifest;
pub mod pipeline;
pub mod registry;

pub use config::{ConfigError, RunConfig, DEFAULT_CONTAINER_SUFFIX, DEFAULT_GROUP};
pub use lock::{lock_file_for, WorkDirLock};
pub use manifest::{write_manifest, MANIFEST_FILE_NAME};
pub use pipeline::{seed_work_dir, DeployReport, FileFailure, Pipeline};
pub use registry::ArtifactRegistry;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("archive error: {0}")]
    Archive(#[from] fatdeploy_archive::ArchiveError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("work directory '{0}' is in use by another run")]
    WorkDirBusy(PathBuf),
    #[error("failed to write manifest '{path}': {reason}")]
    ManifestWrite { path: PathBuf, reason: String },
    #[error("failed to remove work directory '{path}': {source}")]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
}
