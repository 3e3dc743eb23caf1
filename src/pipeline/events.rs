//! Binary-log event dump: per-log raw frame and grouped event CSVs.

use std::path::Path;

use tracing::{error, info};

use crate::annotations::parse_annotation_table;
use crate::cli::EventsArgs;
use crate::config::Config;
use crate::constants::results::{POSITIVE_PREFIX, RAW_PREFIX};
use crate::error::{Error, Result};
use crate::log::{ParseOptions, group_frames, parse_log};
use crate::output::{write_positive_events_csv, write_raw_frames_csv};
use crate::pipeline::file_map::FileMap;

/// Execute the `events` command.
///
/// For every binary log in the file map, writes a raw per-frame CSV
/// and a grouped event CSV next to each other in the output directory,
/// both anchored to the owning ground-truth file's clock. Failing
/// files are reported and skipped.
pub fn execute(args: &EventsArgs, config: &Config) -> Result<()> {
    let file_map = FileMap::load(&args.file_map)?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.defaults.results_dir.clone());
    std::fs::create_dir_all(&output_dir).map_err(|e| Error::OutputDirCreateFailed {
        path: output_dir.clone(),
        source: e,
    })?;

    let threshold = args.threshold.or(config.defaults.threshold);
    let policy = args.grouping.unwrap_or(config.defaults.grouping);

    let mut logs_written = 0_usize;
    let mut events_total = 0_usize;
    for (gt_path, binaries) in &file_map.entries {
        let table = match parse_annotation_table(Path::new(gt_path)) {
            Ok(table) => table,
            Err(e) => {
                error!("Skipping ground truth file {gt_path}: {e}");
                continue;
            }
        };

        for binary_path in binaries.keys() {
            let binary_path = Path::new(binary_path);
            let log = match parse_log(binary_path, ParseOptions::binary(threshold)) {
                Ok(log) => log,
                Err(e) => {
                    error!("Skipping binary log {}: {e}", binary_path.display());
                    continue;
                }
            };
            let events = group_frames(&log.frames, policy);

            let csv_name = binary_path
                .file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
                .replace(".log", ".csv");
            let raw_path = output_dir.join(format!("{RAW_PREFIX}{csv_name}"));
            let positive_path = output_dir.join(format!("{POSITIVE_PREFIX}{csv_name}"));

            write_raw_frames_csv(&raw_path, &log, &table, config.output.csv_bom)?;
            write_positive_events_csv(&positive_path, &log, &events, &table, config.output.csv_bom)?;

            logs_written += 1;
            events_total += events.len();
        }
    }

    info!(
        "Wrote frame and event CSVs for {logs_written} binary log(s) ({events_total} events) to {}",
        output_dir.display()
    );
    Ok(())
}
