use crate::ArchiveError;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Partition of the regular files under a scan root.
///
/// Every regular file lands in exactly one of the two lists: `containers`
/// if its name ends with one of the configured suffixes, `candidates`
/// otherwise. Symlinks and special files are skipped.
#[derive(Debug, Default)]
pub struct Scan {
    pub containers: Vec<PathBuf>,
    pub candidates: Vec<PathBuf>,
}

impl Scan {
    pub fn total(&self) -> usize {
        self.containers.len() + self.candidates.len()
    }
}

/// Recursively walk `root` and classify every regular file.
///
/// Fails with [`ArchiveError::NotFound`] before touching anything if the
/// root is missing or not a directory.
pub fn scan(root: &Path, container_suffixes: &[String]) -> Result<Scan, ArchiveError> {
    if !root.is_dir() {
        return Err(ArchiveError::NotFound(root.to_path_buf()));
    }

    let mut result = Scan::default();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if container_suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            result.containers.push(entry.into_path());
        } else {
            result.candidates.push(entry.into_path());
        }
    }

    debug!(
        "scanned {}: {} containers, {} candidates",
        root.display(),
        result.containers.len(),
        result.candidates.len()
    );
    Ok(result)
}
