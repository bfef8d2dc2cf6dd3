use crate::manifest::MANIFEST_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix marking a file as a container to unpack rather than a candidate.
pub const DEFAULT_CONTAINER_SUFFIX: &str = ".far";

/// Group identifier assigned to every republished bundle.
pub const DEFAULT_GROUP: &str = "com.thirdparty";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// All parameters of one pipeline run. Built once before the run starts and
/// read-only afterwards; there is no ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Scratch directory holding the run's working set. Created by seeding,
    /// deleted wholesale at run end.
    pub work_dir: PathBuf,
    /// File-name suffixes identifying containers to unpack.
    #[serde(default = "default_container_suffixes")]
    pub container_suffixes: Vec<String>,
    /// Group identifier for every resolved coordinate.
    #[serde(default = "default_group")]
    pub default_group: String,
    /// Path of the repository install tool used for publishing.
    #[serde(default)]
    pub tool: Option<PathBuf>,
    /// Where to write the run manifest. Defaults to a sibling of the work
    /// directory so it survives cleanup.
    #[serde(default)]
    pub manifest_out: Option<PathBuf>,
    /// Skip work-directory deletion at run end (debugging aid).
    #[serde(default)]
    pub keep_work_dir: bool,
    /// Resolve and report, but do not invoke the publish collaborator.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_container_suffixes() -> Vec<String> {
    vec![DEFAULT_CONTAINER_SUFFIX.to_owned()]
}

fn default_group() -> String {
    DEFAULT_GROUP.to_owned()
}

impl RunConfig {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            container_suffixes: default_container_suffixes(),
            default_group: default_group(),
            tool: None,
            manifest_out: None,
            keep_work_dir: false,
            dry_run: false,
        }
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container_suffixes.is_empty() {
            return Err(ConfigError::Invalid(
                "container_suffixes must not be empty".to_owned(),
            ));
        }
        if self.container_suffixes.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::Invalid(
                "container suffixes must not be empty strings".to_owned(),
            ));
        }
        if self.default_group.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_group must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Final location of the run manifest: the configured path, or
    /// `composites.txt` next to the work directory.
    pub fn manifest_destination(&self) -> PathBuf {
        if let Some(ref path) = self.manifest_out {
            return path.clone();
        }
        self.work_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
            .join(MANIFEST_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RunConfig::new("/tmp/fatdeploy_build");
        config.validate().unwrap();
        assert_eq!(config.container_suffixes, vec![".far".to_owned()]);
        assert_eq!(config.default_group, "com.thirdparty");
    }

    #[test]
    fn manifest_defaults_to_work_dir_sibling() {
        let config = RunConfig::new("/tmp/run/fatdeploy_build");
        assert_eq!(
            config.manifest_destination(),
            PathBuf::from("/tmp/run/composites.txt")
        );
    }

    #[test]
    fn explicit_manifest_out_wins() {
        let mut config = RunConfig::new("/tmp/fatdeploy_build");
        config.manifest_out = Some(PathBuf::from("/reports/out.txt"));
        assert_eq!(
            config.manifest_destination(),
            PathBuf::from("/reports/out.txt")
        );
    }

    #[test]
    fn loads_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fatdeploy.toml");
        fs::write(
            &path,
            r#"
work_dir = "/tmp/fatdeploy_build"
container_suffixes = [".far", ".fatzip"]
default_group = "org.example.vendor"
tool = "/usr/bin/mvn"
"#,
        )
        .unwrap();

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.container_suffixes.len(), 2);
        assert_eq!(config.default_group, "org.example.vendor");
        assert_eq!(config.tool.as_deref(), Some(Path::new("/usr/bin/mvn")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fatdeploy.toml");
        fs::write(&path, "work_dir = \"/tmp/x\"\nnope = true\n").unwrap();

        let err = RunConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml(_)));
    }

    #[test]
    fn empty_suffix_list_is_invalid() {
        let mut config = RunConfig::new("/tmp/x");
        config.container_suffixes.clear();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }
}
