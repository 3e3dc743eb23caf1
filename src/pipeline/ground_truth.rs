//! Annotation-centric analysis: one record per ground-truth interval.
//!
//! Inverts the `eval` view. Each annotation interval is joined against
//! the first evaluation row whose excerpt window overlaps it, so
//! missed annotations show up as rows with empty prediction fields.

use std::path::Path;

use tracing::{error, info, warn};

use crate::annotations::parse_annotation_table;
use crate::cli::GroundTruthArgs;
use crate::config::Config;
use crate::constants::results::GROUND_TRUTH_RESULTS;
use crate::error::{Error, Result};
use crate::matching::{TimeRange, seconds_between, whole_second_overlap};
use crate::output::{GroundTruthRecord, GroundTruthWriter, PredictionFields, ResultsRow, read_results};
use crate::pipeline::file_map::FileMap;

/// Join one ground-truth file's annotations against evaluation rows.
pub fn analyze_annotations(gt_path: &Path, rows: &[ResultsRow]) -> Result<Vec<GroundTruthRecord>> {
    let table = parse_annotation_table(gt_path)?;
    let gt_name = gt_path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());

    let relevant: Vec<&ResultsRow> = rows
        .iter()
        .filter(|row| row.ground_truth_file == gt_name)
        .collect();

    let mut records = Vec::new();
    for interval in &table.intervals {
        let range = TimeRange::from_offsets(
            table.recording_start_time,
            interval.start_t,
            interval.end_t,
        );

        let prediction = relevant
            .iter()
            .find(|row| overlaps(range, row))
            .map(|row| PredictionFields {
                binary_prediction_file: row.binary_prediction_file.clone(),
                binary_start: row.binary_start.clone(),
                binary_end: row.binary_end.clone(),
                binary_start_rel: row.binary_start_rel.clone(),
                binary_end_rel: row.binary_end_rel.clone(),
                multiclass_prediction_file: row.multiclass_prediction_file.clone(),
                multiclass_prediction: row.multiclass_prediction.clone(),
                quality: row.quality.clone(),
                notes: row.notes.clone(),
                song: row.song.clone(),
                call_type: row.call_type.clone(),
                likely_sex: row.likely_sex.clone(),
            });

        records.push(GroundTruthRecord {
            ground_truth_file: gt_name.clone(),
            ground_truth: interval.class_id.clone(),
            ground_truth_start: range.start,
            ground_truth_end: range.end,
            ground_truth_start_rel: seconds_between(table.recording_start_time, range.start),
            ground_truth_end_rel: seconds_between(table.recording_start_time, range.end),
            prediction,
        });
    }
    Ok(records)
}

/// Whether a results row's excerpt window overlaps the annotation.
/// Rows whose window cannot be parsed back are reported and treated as
/// non-overlapping.
fn overlaps(range: TimeRange, row: &ResultsRow) -> bool {
    match row.binary_range() {
        Ok(window) => whole_second_overlap(range, window) > 0,
        Err(e) => {
            warn!(
                "Ignoring results row for {}: {e}",
                row.multiclass_prediction_file
            );
            false
        }
    }
}

/// Execute the `ground-truth` command.
pub fn execute(args: &GroundTruthArgs, config: &Config) -> Result<()> {
    let file_map = FileMap::load(&args.file_map)?;
    let rows = read_results(&args.results)?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.defaults.results_dir.clone());
    std::fs::create_dir_all(&output_dir).map_err(|e| Error::OutputDirCreateFailed {
        path: output_dir.clone(),
        source: e,
    })?;

    let output_path = output_dir.join(GROUND_TRUTH_RESULTS);
    let mut writer = GroundTruthWriter::create(&output_path, config.output.csv_bom)?;

    let mut written = 0_usize;
    for gt_path in file_map.entries.keys() {
        match analyze_annotations(Path::new(gt_path), &rows) {
            Ok(records) => {
                for record in &records {
                    writer.write_record(record)?;
                }
                written += records.len();
            }
            Err(e) => error!("Skipping ground truth file {gt_path}: {e}"),
        }
    }
    writer.finalize()?;

    info!("Wrote {written} annotation records to {}", output_path.display());
    Ok(())
}
