use crate::registry::ArtifactRegistry;
use crate::CoreError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// File name of the run manifest when no explicit destination is configured.
pub const MANIFEST_FILE_NAME: &str = "composites.txt";

/// Write the run manifest: one `group:artifact:version` line per registry
/// entry, overwriting any existing file at `path`. Written via a temp file
/// and rename so a failed run never leaves a half-written manifest.
pub fn write_manifest(registry: &ArtifactRegistry, path: &Path) -> Result<(), CoreError> {
    let to_core = |reason: String| CoreError::ManifestWrite {
        path: path.to_path_buf(),
        reason,
    };

    let mut content = String::new();
    for (_, coordinate) in registry.iter() {
        content.push_str(&coordinate.to_string());
        content.push('\n');
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| to_core(e.to_string()))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| to_core(e.to_string()))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| to_core(e.to_string()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| to_core(e.to_string()))?;
    tmp.persist(path).map_err(|e| to_core(e.error.to_string()))?;

    info!("wrote manifest with {} entries: {}", registry.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatdeploy_schema::Coordinate;
    use std::path::PathBuf;

    fn registry_with(artifacts: &[&str]) -> ArtifactRegistry {
        let mut registry = ArtifactRegistry::new();
        for artifact in artifacts {
            registry.record(
                PathBuf::from(format!("/w/{artifact}.jar")),
                Coordinate::new("com.thirdparty", *artifact, "1.0.0").unwrap(),
            );
        }
        registry
    }

    #[test]
    fn writes_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("composites.txt");

        write_manifest(&registry_with(&["alpha", "beta"]), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&"com.thirdparty:alpha:1.0.0"));
        assert!(lines.contains(&"com.thirdparty:beta:1.0.0"));
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("composites.txt");
        std::fs::write(&path, "stale content\n").unwrap();

        write_manifest(&registry_with(&["alpha"]), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "com.thirdparty:alpha:1.0.0\n");
    }

    #[test]
    fn empty_registry_writes_empty_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("composites.txt");

        write_manifest(&ArtifactRegistry::new(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn unwritable_destination_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = write_manifest(&registry_with(&["a"]), &blocker.join("composites.txt"))
            .unwrap_err();
        assert!(matches!(err, CoreError::ManifestWrite { .. }));
    }
}
