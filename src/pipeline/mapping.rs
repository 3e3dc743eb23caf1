//! Building the ground-truth → binary → multiclass file map.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cli::MapArgs;
use crate::constants::filenames::{
    ANNOTATION_EXTENSION, AUDIO_EXTENSION, LEADING_COMPONENTS, LOG_EXTENSION, LOG_SUFFIX,
};
use crate::error::Result;
use crate::log::{ParseOptions, parse_log};
use crate::pipeline::file_map::FileMap;
use crate::utils::filename;

/// Counts and leftovers from a mapping run.
#[derive(Debug, Default)]
pub struct MappingSummary {
    /// Ground-truth files discovered.
    pub ground_truth_files: usize,
    /// Binary logs associated with some ground-truth file.
    pub binary_logs: usize,
    /// Multiclass logs associated with some binary log.
    pub multiclass_logs: usize,
    /// Binary logs no ground-truth file claimed.
    pub unmapped_binary_logs: Vec<PathBuf>,
}

/// Build the association map from three directory trees.
///
/// Binary logs attach to a ground-truth file when their path contains
/// the annotation's leading filename component; multiclass logs attach
/// to a binary log when their recorded source audio path contains the
/// binary log's audio file name. Multiclass logs that fail to parse
/// are reported and left out.
pub fn build_file_map(
    ground_truth_dir: &Path,
    binary_dir: &Path,
    multiclass_dir: &Path,
) -> Result<(FileMap, MappingSummary)> {
    let ground_truth_files = collect_files(ground_truth_dir, ANNOTATION_EXTENSION)?;
    let binary_files = collect_files(binary_dir, LOG_EXTENSION)?;
    let multiclass_files = collect_files(multiclass_dir, LOG_EXTENSION)?;

    // Multiclass association needs each log's recorded audio path, so
    // parse them all up front.
    let mut multiclass_logs = Vec::new();
    for path in &multiclass_files {
        match parse_log(path, ParseOptions::multiclass()) {
            Ok(log) => multiclass_logs.push(log),
            Err(e) => warn!("Skipping unparseable multiclass log {}: {e}", path.display()),
        }
    }

    let mut map = FileMap::default();
    let mut summary = MappingSummary {
        ground_truth_files: ground_truth_files.len(),
        ..MappingSummary::default()
    };
    let mut claimed: Vec<&PathBuf> = Vec::new();

    for gt in &ground_truth_files {
        let stem = filename::annotation_stem(gt);
        let leading = filename::leading_component(&stem, LEADING_COMPONENTS);

        let mut binaries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for binary in binary_files
            .iter()
            .filter(|b| b.to_string_lossy().contains(&leading))
        {
            claimed.push(binary);
            let multis = multiclass_for_binary(binary, &multiclass_logs);
            summary.binary_logs += 1;
            summary.multiclass_logs += multis.len();
            binaries.insert(binary.to_string_lossy().into_owned(), multis);
        }
        map.entries
            .insert(gt.to_string_lossy().into_owned(), binaries);
    }

    summary.unmapped_binary_logs = binary_files
        .iter()
        .filter(|b| !claimed.contains(b))
        .cloned()
        .collect();

    Ok((map, summary))
}

/// Multiclass logs whose recorded source audio contains the binary
/// log's audio file name.
fn multiclass_for_binary(
    binary: &Path,
    multiclass_logs: &[crate::log::PredictionLog],
) -> Vec<String> {
    let wav_file = format!("{}{AUDIO_EXTENSION}", filename::log_stem(binary));
    multiclass_logs
        .iter()
        .filter(|log| log.source_audio_path.contains(&wav_file))
        .map(|log| log.file_path.to_string_lossy().into_owned())
        .collect()
}

/// Recursively collect files with the given extension, sorted for
/// deterministic map contents.
fn collect_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files_recursive(dir, extension, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files_recursive(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_files_recursive(&path, extension, files)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(OsStr::new(extension)))
        {
            files.push(path);
        }
    }
    Ok(())
}

/// Execute the `map` command.
pub fn execute(args: &MapArgs) -> Result<()> {
    let (map, summary) = build_file_map(&args.ground_truth, &args.binary, &args.multiclass)?;
    map.save(&args.output)?;

    for unmapped in &summary.unmapped_binary_logs {
        warn!("No ground truth claimed binary log {}", unmapped.display());
    }
    info!(
        "Mapped {} ground truth files, {} binary logs, {} multiclass logs to {}",
        summary.ground_truth_files,
        summary.binary_logs,
        summary.multiclass_logs,
        args.output.display()
    );
    Ok(())
}
