//! CLI argument definitions.

use crate::log::GroupingPolicy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Evaluate acoustic event detectors against annotated ground truth.
#[derive(Debug, Parser)]
#[command(name = "deteval")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by all subcommands.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by all subcommands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Suppress progress bars.
    #[arg(long, global = true)]
    pub no_progress: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the ground-truth to prediction-log file map.
    Map(MapArgs),
    /// Match multiclass excerpts against ground-truth annotations.
    Eval(EvalArgs),
    /// Join annotations against the first overlapping prediction.
    GroundTruth(GroundTruthArgs),
    /// Write per-log frame and grouped-event CSVs for binary logs.
    Events(EventsArgs),
    /// Convert evaluation results into selection tables.
    Tables(TablesArgs),
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the map command.
#[derive(Debug, Args)]
pub struct MapArgs {
    /// Directory containing annotation (selection) tables.
    #[arg(long, env = "DETEVAL_GROUND_TRUTH_DIR")]
    pub ground_truth: PathBuf,

    /// Directory containing binary detector logs.
    #[arg(long, env = "DETEVAL_BINARY_DIR")]
    pub binary: PathBuf,

    /// Directory containing multiclass classifier logs.
    #[arg(long, env = "DETEVAL_MULTICLASS_DIR")]
    pub multiclass: PathBuf,

    /// Output path for the file map JSON.
    #[arg(short, long, default_value = "results/file_map.json")]
    pub output: PathBuf,
}

/// Arguments for the eval command.
#[derive(Debug, Args)]
pub struct EvalArgs {
    /// Path to the file map JSON.
    pub file_map: PathBuf,

    /// Output directory (default: from config).
    #[arg(short, long, env = "DETEVAL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Positivity threshold for binary frames (0.0-1.0); overrides the
    /// raw decision flag.
    #[arg(short, long, value_parser = parse_threshold, env = "DETEVAL_THRESHOLD")]
    pub threshold: Option<f64>,
}

/// Arguments for the ground-truth command.
#[derive(Debug, Args)]
pub struct GroundTruthArgs {
    /// Path to the file map JSON.
    pub file_map: PathBuf,

    /// Path to an eval results CSV.
    pub results: PathBuf,

    /// Output directory (default: from config).
    #[arg(short, long, env = "DETEVAL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the events command.
#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Path to the file map JSON.
    pub file_map: PathBuf,

    /// Output directory (default: from config).
    #[arg(short, long, env = "DETEVAL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Positivity threshold for binary frames (0.0-1.0); overrides the
    /// raw decision flag.
    #[arg(short, long, value_parser = parse_threshold, env = "DETEVAL_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Grouping policy for merging frames into events.
    #[arg(short, long, value_enum)]
    pub grouping: Option<GroupingPolicy>,
}

/// Arguments for the tables command.
#[derive(Debug, Args)]
pub struct TablesArgs {
    /// Path to an eval results CSV.
    pub results: PathBuf,

    /// Output directory (default: from config).
    #[arg(short, long, env = "DETEVAL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Parse and validate a threshold value.
fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(format!("threshold must be between 0.0 and 1.0, got {threshold}"))
    }
}
