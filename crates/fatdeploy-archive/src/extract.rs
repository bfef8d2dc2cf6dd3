use crate::ArchiveError;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Extract every entry of `archive_path` into `dest`, preserving relative
/// paths and overwriting files already present. Returns the number of file
/// entries written.
///
/// A file that is not a valid archive fails with [`ArchiveError::Corrupt`];
/// the caller is expected to treat that as a per-file condition and keep
/// going. Entries whose names would escape the destination are skipped.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::Corrupt {
        file: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    fs::create_dir_all(dest)?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| ArchiveError::Corrupt {
            file: archive_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let Some(relative) = entry.enclosed_name() else {
            warn!(
                "skipping unsafe entry '{}' in {}",
                entry.name(),
                archive_path.display()
            );
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }

    debug!(
        "extracted {written} entries from {} into {}",
        archive_path.display(),
        dest.display()
    );
    Ok(written)
}
