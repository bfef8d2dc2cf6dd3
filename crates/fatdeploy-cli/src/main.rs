mod commands;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_PIPELINE_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "fatdeploy",
    version,
    about = "Unpack fat build archives and republish contained bundles to an artifact repository"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that drives the pipeline.
#[derive(Debug, Args)]
struct PipelineArgs {
    /// Fat archive(s) to process; copied into the work directory first.
    #[arg(long = "source", required = true)]
    sources: Vec<PathBuf>,

    /// Scratch directory for this run (created fresh, deleted at run end).
    /// Defaults to `fatdeploy_build` in the current directory.
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// File-name suffix identifying containers to unpack (repeatable).
    #[arg(long = "unpack-suffix")]
    unpack_suffixes: Vec<String>,

    /// Group identifier assigned to every republished bundle.
    #[arg(long)]
    group: Option<String>,

    /// Read run parameters from a TOML config file (flags override it).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Unpack the fat archive(s), publish every contained bundle, and write
    /// the run manifest.
    Deploy {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Path of the repository install tool. Overrides a config-file
        /// value; defaults to `mvn` when neither names one.
        #[arg(long)]
        tool: Option<PathBuf>,

        /// Where to write the run manifest (default: composites.txt next to
        /// the work directory).
        #[arg(long)]
        manifest_out: Option<PathBuf>,

        /// Keep the work directory after the run (debugging aid).
        #[arg(long, default_value_t = false)]
        keep_work_dir: bool,

        /// Resolve and report, but do not invoke the publish tool.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Show the coordinates that a deploy would publish, without publishing.
    Inspect {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("FATDEPLOY_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;
    let result = match cli.command {
        Commands::Deploy {
            pipeline,
            tool,
            manifest_out,
            keep_work_dir,
            dry_run,
        } => commands::deploy::run(
            &pipeline,
            tool,
            manifest_out,
            keep_work_dir,
            dry_run,
            json_output,
        ),
        Commands::Inspect { pipeline } => commands::inspect::run(&pipeline, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("config error:") || msg.starts_with("invalid config") {
                EXIT_CONFIG_ERROR
            } else if msg.starts_with("pipeline failed:") {
                EXIT_PIPELINE_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
