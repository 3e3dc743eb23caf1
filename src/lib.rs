//! Deteval - acoustic event detector evaluation CLI.
//!
//! This crate aligns automated detector predictions with
//! human-annotated selection tables on a shared absolute timeline and
//! produces matched event records for downstream accuracy analysis.

#![warn(missing_docs)]

pub mod annotations;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod log;
pub mod matching;
pub mod output;
pub mod pipeline;
pub mod utils;

use clap::Parser;
use cli::{Cli, Command, ConfigAction};
use config::{Config, config_file_path, load_default_config, save_default_config};

pub use error::{Error, Result};

/// Main entry point for the deteval CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet);

    let config = load_default_config()?;
    let progress_enabled = !cli.global.quiet && !cli.global.no_progress;

    match cli.command {
        Command::Map(args) => pipeline::mapping::execute(&args),
        Command::Eval(args) => pipeline::evaluator::execute(&args, &config, progress_enabled),
        Command::GroundTruth(args) => pipeline::ground_truth::execute(&args, &config),
        Command::Events(args) => pipeline::events::execute(&args, &config),
        Command::Tables(args) => pipeline::tables::execute(&args, &config),
        Command::Config { action } => handle_config_command(action),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
