use super::{build_config, json_pretty, spin_fail, spin_ok, spinner, DEFAULT_TOOL, EXIT_SUCCESS};
use crate::PipelineArgs;
use console::style;
use fatdeploy_core::{seed_work_dir, Pipeline};
use fatdeploy_publish::InstallTool;
use std::path::PathBuf;

#[allow(clippy::fn_params_excessive_bools)]
pub fn run(
    args: &PipelineArgs,
    tool: Option<PathBuf>,
    manifest_out: Option<PathBuf>,
    keep_work_dir: bool,
    dry_run: bool,
    json: bool,
) -> Result<u8, String> {
    let mut config = build_config(args)?;
    if manifest_out.is_some() {
        config.manifest_out = manifest_out;
    }
    config.keep_work_dir |= keep_work_dir;
    config.dry_run |= dry_run;

    // Flag wins over config file, config file over the built-in default.
    let tool = tool
        .or_else(|| config.tool.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOL));
    let dry = config.dry_run;

    seed_work_dir(&config.work_dir, &args.sources)
        .map_err(|e| format!("failed to seed work directory: {e}"))?;

    let pipeline = Pipeline::new(config).map_err(|e| format!("config error: {e}"))?;
    let publisher = InstallTool::new(tool);

    let pb = if json {
        None
    } else {
        Some(spinner("deploying artifacts..."))
    };
    let report = match pipeline.run(&publisher) {
        Ok(report) => {
            if let Some(ref pb) = pb {
                if dry {
                    spin_ok(pb, "resolved (dry run, nothing published)");
                } else {
                    spin_ok(pb, "deploy finished");
                }
            }
            report
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "deploy failed");
            }
            return Err(format!("pipeline failed: {e}"));
        }
    };

    if json {
        println!("{}", json_pretty(&report)?);
        return Ok(EXIT_SUCCESS);
    }

    if dry {
        println!("resolved {} artifact(s)", report.resolved.len());
        for coordinate in &report.resolved {
            println!("  {coordinate}");
        }
    } else {
        println!(
            "published {} of {} artifact(s)",
            report.published.len(),
            report.resolved.len()
        );
        for coordinate in &report.published {
            println!("  {}", style(coordinate.to_string()).green());
        }
        for failure in &report.failed_publishes {
            println!(
                "  {} {}: {}",
                style("✗").red(),
                failure.file.display(),
                failure.reason
            );
        }
    }
    if !report.skipped_containers.is_empty() {
        println!(
            "skipped {} corrupt container(s)",
            report.skipped_containers.len()
        );
    }
    if !report.unresolved_candidates.is_empty() {
        println!(
            "{} file(s) had no resolvable identity",
            report.unresolved_candidates.len()
        );
    }
    if !report.nested_containers.is_empty() {
        println!(
            "{} nested container(s) left packed",
            report.nested_containers.len()
        );
    }
    if let Some(ref path) = report.manifest_path {
        println!("manifest: {}", path.display());
    }
    Ok(EXIT_SUCCESS)
}
