//! Directory scanning and container extraction for fatdeploy.
//!
//! This crate walks a working directory, partitions regular files into
//! containers (by suffix) and publish candidates, and extracts container
//! archives in place. Corrupt containers surface as a per-file error the
//! caller can skip without aborting the batch.

pub mod extract;
pub mod scan;

pub use extract::extract_archive;
pub use scan::{scan, Scan};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("source location not found or not a directory: {0}")]
    NotFound(PathBuf),
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("corrupt or unsupported archive '{file}': {reason}")]
    Corrupt { file: PathBuf, reason: String },
}
