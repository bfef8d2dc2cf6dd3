use crate::config::RunConfig;
use crate::lock::{lock_file_for, WorkDirLock};
use crate::manifest::write_manifest;
use crate::registry::ArtifactRegistry;
use crate::CoreError;
use fatdeploy_archive::{extract_archive, scan, ArchiveError};
use fatdeploy_publish::{Publisher, PublishRequest};
use fatdeploy_schema::{resolve_coordinate, Coordinate};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One per-file failure that was contained instead of aborting the run.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: PathBuf,
    pub reason: String,
}

impl FileFailure {
    fn new(file: &Path, reason: &impl Display) -> Self {
        Self {
            file: file.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Outcome of one pipeline run: per-phase counts, the coordinates that were
/// resolved and published, and every contained per-file failure.
#[derive(Debug, Serialize)]
pub struct DeployReport {
    pub started_at: String,
    pub finished_at: String,
    pub containers_unpacked: usize,
    pub files_extracted: usize,
    pub resolved: Vec<Coordinate>,
    pub published: Vec<Coordinate>,
    pub skipped_containers: Vec<FileFailure>,
    pub unresolved_candidates: Vec<FileFailure>,
    pub failed_publishes: Vec<FileFailure>,
    /// Containers that only surfaced after the first extraction and were
    /// left packed (unpacking is single-pass).
    pub nested_containers: Vec<PathBuf>,
    pub manifest_path: Option<PathBuf>,
}

impl DeployReport {
    fn begin() -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            finished_at: String::new(),
            containers_unpacked: 0,
            files_extracted: 0,
            resolved: Vec::new(),
            published: Vec::new(),
            skipped_containers: Vec::new(),
            unresolved_candidates: Vec::new(),
            failed_publishes: Vec::new(),
            nested_containers: Vec::new(),
            manifest_path: None,
        }
    }

    fn finish(&mut self) {
        self.finished_at = chrono::Utc::now().to_rfc3339();
    }

    /// True if every discovered container unpacked, no nested container was
    /// left packed, every candidate resolved, and every publish attempt
    /// succeeded.
    pub fn is_clean(&self) -> bool {
        self.skipped_containers.is_empty()
            && self.unresolved_candidates.is_empty()
            && self.failed_publishes.is_empty()
            && self.nested_containers.is_empty()
    }
}

/// Copy source archives into a (freshly created) work directory, keeping
/// their file names. The pipeline only ever reads from the work directory,
/// so the originals are never touched.
pub fn seed_work_dir(work_dir: &Path, sources: &[PathBuf]) -> Result<(), CoreError> {
    fs::create_dir_all(work_dir)?;
    for source in sources {
        let name = source.file_name().ok_or_else(|| {
            CoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("source has no file name: {}", source.display()),
            ))
        })?;
        fs::copy(source, work_dir.join(name))?;
    }
    Ok(())
}

/// Drives one full run over a configured work directory.
pub struct Pipeline {
    config: RunConfig,
}

impl Pipeline {
    pub fn new(config: RunConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the full pipeline: unpack, resolve, publish, write the manifest,
    /// delete the work directory.
    ///
    /// Per-file failures (corrupt container, unresolvable candidate, failed
    /// publish) are logged, recorded in the report, and do not abort the
    /// run. Only a missing work directory, a manifest-write failure, or a
    /// cleanup failure surfaces as the run's error.
    pub fn run(&self, publisher: &dyn Publisher) -> Result<DeployReport, CoreError> {
        let _lock = self.lock()?;
        let mut report = DeployReport::begin();

        let registry = self.unpack_and_resolve(&mut report)?;
        report.resolved = registry.coordinates();

        if self.config.dry_run {
            info!(
                "dry run: skipping publish of {} artifacts via '{}'",
                registry.len(),
                publisher.name()
            );
        } else {
            self.publish_all(&registry, publisher, &mut report);
        }

        let manifest_path = self.config.manifest_destination();
        write_manifest(&registry, &manifest_path)?;
        report.manifest_path = Some(manifest_path);

        self.cleanup()?;
        report.finish();
        Ok(report)
    }

    /// Unpack and resolve only: everything up to (but not including) the
    /// publish phase, then clean up. Used for inspection.
    pub fn resolve(&self) -> Result<DeployReport, CoreError> {
        let _lock = self.lock()?;
        let mut report = DeployReport::begin();

        let registry = self.unpack_and_resolve(&mut report)?;
        report.resolved = registry.coordinates();

        self.cleanup()?;
        report.finish();
        Ok(report)
    }

    fn lock(&self) -> Result<WorkDirLock, CoreError> {
        // A missing work directory fails before even the sibling lock file
        // is created.
        if !self.config.work_dir.is_dir() {
            return Err(ArchiveError::NotFound(self.config.work_dir.clone()).into());
        }
        let lock_path = lock_file_for(&self.config.work_dir);
        WorkDirLock::try_acquire(&lock_path)?
            .ok_or_else(|| CoreError::WorkDirBusy(self.config.work_dir.clone()))
    }

    /// Phases 1+2: unpack every container found under the work directory,
    /// then resolve a coordinate for every candidate in the flattened tree.
    ///
    /// Unpacking is single-pass: a container that only appears after a first
    /// extraction is left packed and reported in `nested_containers`.
    fn unpack_and_resolve(&self, report: &mut DeployReport) -> Result<ArtifactRegistry, CoreError> {
        let work_dir = &self.config.work_dir;

        let first_pass = scan(work_dir, &self.config.container_suffixes)?;
        info!(
            "found {} containers and {} candidates under {}",
            first_pass.containers.len(),
            first_pass.candidates.len(),
            work_dir.display()
        );

        for container in &first_pass.containers {
            match extract_archive(container, work_dir) {
                Ok(count) => {
                    report.containers_unpacked += 1;
                    report.files_extracted += count;
                }
                Err(e) => {
                    warn!("skipping container {}: {e}", container.display());
                    report.skipped_containers.push(FileFailure::new(container, &e));
                }
            }
        }

        let second_pass = scan(work_dir, &self.config.container_suffixes)?;

        let seen: HashSet<&PathBuf> = first_pass.containers.iter().collect();
        for container in &second_pass.containers {
            if !seen.contains(container) {
                warn!("nested container left packed: {}", container.display());
                report.nested_containers.push(container.clone());
            }
        }

        let mut registry = ArtifactRegistry::new();
        for candidate in &second_pass.candidates {
            match resolve_coordinate(candidate, &self.config.default_group) {
                Ok(coordinate) => {
                    registry.record(candidate.clone(), coordinate);
                }
                Err(e) => {
                    warn!("no identity for {}: {e}", candidate.display());
                    report
                        .unresolved_candidates
                        .push(FileFailure::new(candidate, &e));
                }
            }
        }

        info!("resolved {} publishable artifacts", registry.len());
        Ok(registry)
    }

    /// Phase 3: publish each registry entry. Each attempt is independent; a
    /// failure is recorded and the rest of the batch still runs.
    fn publish_all(
        &self,
        registry: &ArtifactRegistry,
        publisher: &dyn Publisher,
        report: &mut DeployReport,
    ) {
        // Snapshot first: the publish fan-out never touches the registry.
        let entries: Vec<(PathBuf, Coordinate)> = registry
            .iter()
            .map(|(path, coordinate)| (path.clone(), coordinate.clone()))
            .collect();

        for (path, coordinate) in entries {
            let display_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            info!("publishing {display_name} as {coordinate}");

            let request = PublishRequest::for_bundle(coordinate.clone(), path.clone());
            match publisher.publish(&request) {
                Ok(()) => report.published.push(coordinate),
                Err(e) => {
                    warn!("publish failed for {display_name}: {e}");
                    report.failed_publishes.push(FileFailure::new(&path, &e));
                }
            }
        }
    }

    /// Final phase: delete the work directory tree. Leftover state would
    /// leak into the next run, so a deletion failure is terminal.
    fn cleanup(&self) -> Result<(), CoreError> {
        if self.config.keep_work_dir {
            info!("keeping work directory {}", self.config.work_dir.display());
            return Ok(());
        }
        if !self.config.work_dir.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&self.config.work_dir).map_err(|source| CoreError::Cleanup {
            path: self.config.work_dir.clone(),
            source,
        })
    }
}
