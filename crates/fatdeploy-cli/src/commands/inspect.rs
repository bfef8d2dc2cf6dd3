use super::{build_config, json_pretty, EXIT_SUCCESS};
use crate::PipelineArgs;
use fatdeploy_core::{seed_work_dir, Pipeline};

pub fn run(args: &PipelineArgs, json: bool) -> Result<u8, String> {
    let config = build_config(args)?;

    seed_work_dir(&config.work_dir, &args.sources)
        .map_err(|e| format!("failed to seed work directory: {e}"))?;

    let pipeline = Pipeline::new(config).map_err(|e| format!("config error: {e}"))?;
    let report = pipeline.resolve().map_err(|e| format!("pipeline failed: {e}"))?;

    if json {
        println!("{}", json_pretty(&report.resolved)?);
    } else if report.resolved.is_empty() {
        println!("no publishable artifacts found");
    } else {
        println!("{:<44} {:<24} VERSION", "ARTIFACT", "GROUP");
        for coordinate in &report.resolved {
            println!(
                "{:<44} {:<24} {}",
                coordinate.artifact, coordinate.group, coordinate.version
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
