use crate::{PublishError, Publisher, PublishRequest};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Tool goal that installs a single file into the artifact repository.
pub const INSTALL_GOAL: &str = "install:install-file";

/// Publishes artifacts by spawning an external repository install tool once
/// per artifact, passing the coordinate and file as `-D` properties.
pub struct InstallTool {
    tool: PathBuf,
}

impl InstallTool {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }

    fn arguments(request: &PublishRequest, file: &Path) -> Vec<String> {
        vec![
            INSTALL_GOAL.to_owned(),
            "--batch-mode".to_owned(),
            format!("-DgroupId={}", request.coordinate.group),
            format!("-DartifactId={}", request.coordinate.artifact),
            format!("-Dversion={}", request.coordinate.version),
            format!("-Dpackaging={}", request.packaging),
            format!("-Dfile={}", file.display()),
            format!("-DgeneratePom={}", request.generate_descriptor),
        ]
    }
}

impl Publisher for InstallTool {
    fn name(&self) -> &'static str {
        "install-tool"
    }

    fn publish(&self, request: &PublishRequest) -> Result<(), PublishError> {
        // The tool resolves the file itself, so pass an absolute path.
        let file = request
            .file
            .canonicalize()
            .map_err(|_| PublishError::MissingFile(request.file.clone()))?;

        let args = Self::arguments(request, &file);
        debug!("running {} {}", self.tool.display(), args.join(" "));

        let output = Command::new(&self.tool)
            .args(&args)
            .output()
            .map_err(|source| PublishError::Spawn {
                tool: self.tool.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(PublishError::ToolFailed {
                artifact: request.coordinate.to_string(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(())
    }
}
