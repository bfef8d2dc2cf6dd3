pub mod completions;
pub mod deploy;
pub mod inspect;

use crate::PipelineArgs;
use fatdeploy_core::RunConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_PIPELINE_ERROR: u8 = 3;

/// Work directory used when neither a flag nor a config file names one.
pub const DEFAULT_WORK_DIR: &str = "fatdeploy_build";

/// Install tool used when neither a flag nor a config file names one.
pub const DEFAULT_TOOL: &str = "mvn";

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Build the run configuration: config file first (if any), then flags on top.
pub fn build_config(args: &PipelineArgs) -> Result<RunConfig, String> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path).map_err(|e| format!("config error: {e}"))?,
        None => RunConfig::new(
            args.work_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_DIR)),
        ),
    };
    if let Some(ref dir) = args.work_dir {
        config.work_dir = dir.clone();
    }
    if !args.unpack_suffixes.is_empty() {
        config.container_suffixes = args.unpack_suffixes.clone();
    }
    if let Some(ref group) = args.group {
        config.default_group = group.clone();
    }
    config
        .validate()
        .map_err(|e| format!("config error: {e}"))?;
    Ok(config)
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}
