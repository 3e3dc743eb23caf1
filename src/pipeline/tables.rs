//! Selection-table export of evaluation results.

use tracing::info;

use crate::cli::TablesArgs;
use crate::config::Config;
use crate::constants::selection_table::PREDICTIONS_SUFFIX;
use crate::error::{Error, Result};
use crate::output::{ResultsRow, read_results, write_selection_table};

/// Execute the `tables` command.
///
/// Splits an `eval` results file by ground-truth file and writes one
/// tab-separated selection table per source table, preserving row
/// order within each.
pub fn execute(args: &TablesArgs, config: &Config) -> Result<()> {
    let rows = read_results(&args.results)?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.defaults.results_dir.clone());
    std::fs::create_dir_all(&output_dir).map_err(|e| Error::OutputDirCreateFailed {
        path: output_dir.clone(),
        source: e,
    })?;

    // Ground-truth files in first-appearance order.
    let mut gt_files: Vec<&str> = Vec::new();
    for row in &rows {
        if !gt_files.contains(&row.ground_truth_file.as_str()) {
            gt_files.push(&row.ground_truth_file);
        }
    }

    for &gt_file in &gt_files {
        let table_rows: Vec<&ResultsRow> = rows
            .iter()
            .filter(|row| row.ground_truth_file == gt_file)
            .collect();

        let name = gt_file.strip_suffix(".txt").unwrap_or(gt_file).to_string()
            + PREDICTIONS_SUFFIX;
        write_selection_table(&output_dir.join(name), &table_rows)?;
    }

    info!(
        "Wrote {} selection table(s) to {}",
        gt_files.len(),
        output_dir.display()
    );
    Ok(())
}
