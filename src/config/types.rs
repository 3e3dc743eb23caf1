//! Configuration type definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::log::GroupingPolicy;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Positivity threshold for binary frames. When unset, the raw
    /// decision flag from the log is used.
    pub threshold: Option<f64>,

    /// Grouping policy for the `events` command.
    pub grouping: GroupingPolicy,

    /// Directory receiving result files when no `-o` is given.
    pub results_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            grouping: GroupingPolicy::Smooth,
            results_dir: PathBuf::from("results"),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write a UTF-8 BOM at the start of CSV files for Excel
    /// compatibility.
    pub csv_bom: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { csv_bom: true }
    }
}
