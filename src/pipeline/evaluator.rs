//! Excerpt evaluation: the core matched-record pipeline.
//!
//! For every multiclass excerpt reachable through the file map, the
//! evaluator computes the excerpt's absolute window, aggregates its
//! weighted class vote, matches the window against the ground-truth
//! annotation intervals, and emits one matched record. Failures on
//! individual files are reported and skipped; the batch always runs to
//! completion.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, error, info};

use crate::annotations::{AnnotationTable, parse_annotation_table};
use crate::cli::EvalArgs;
use crate::config::Config;
use crate::constants::results::PREDICTION_RESULTS;
use crate::error::{Error, Result};
use crate::log::{ParseOptions, PredictionLog, parse_log, weighted_prediction};
use crate::matching::{TimeRange, find_overlap, seconds_between};
use crate::output::progress;
use crate::output::{GroundTruthFields, MatchedRecord, ResultsWriter};
use crate::pipeline::file_map::FileMap;

/// Evaluation settings resolved from CLI and config.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOptions {
    /// Positivity threshold for binary logs; `None` uses the raw
    /// decision flag.
    pub threshold: Option<f64>,
}

/// Evaluate all excerpts of one ground-truth file.
///
/// Records are sorted by absolute window start before being returned.
pub fn evaluate_ground_truth(
    gt_path: &Path,
    binaries: &BTreeMap<String, Vec<String>>,
    options: EvalOptions,
) -> Result<Vec<MatchedRecord>> {
    let table = parse_annotation_table(gt_path)?;
    let ranges = table.interval_ranges();
    let gt_name = base_name(gt_path);

    let mut records = Vec::new();
    for (binary_path, multiclass_paths) in binaries {
        let binary_path = Path::new(binary_path);
        match parse_log(binary_path, ParseOptions::binary(options.threshold)) {
            Ok(log) => debug!(
                "Binary log {} carries {} frames",
                binary_path.display(),
                log.frames.len()
            ),
            Err(e) => {
                error!("Skipping binary log {}: {e}", binary_path.display());
                continue;
            }
        }

        for multiclass_path in multiclass_paths {
            let multiclass_path = Path::new(multiclass_path);
            let excerpt = parse_log(multiclass_path, ParseOptions::multiclass())
                .and_then(|log| excerpt_record(&table, &ranges, &log, &gt_name, binary_path));
            match excerpt {
                Ok(record) => records.push(record),
                Err(e) => error!("Skipping excerpt {}: {e}", multiclass_path.display()),
            }
        }
    }

    records.sort_by_key(|r| r.binary_start);
    Ok(records)
}

/// Build the matched record for one multiclass excerpt.
fn excerpt_record(
    table: &AnnotationTable,
    ranges: &[TimeRange],
    excerpt: &PredictionLog,
    gt_name: &str,
    binary_path: &Path,
) -> Result<MatchedRecord> {
    let (offset_start, offset_end) =
        excerpt
            .excerpt_offset
            .ok_or_else(|| Error::MalformedExcerptOffset {
                name: excerpt.source_audio_path.clone(),
            })?;
    let window = TimeRange::from_offsets(excerpt.recording_start_time, offset_start, offset_end);
    let prediction = weighted_prediction(&excerpt.frames)?.to_lowercase();

    let ground_truth = find_overlap(window, ranges).map(|idx| {
        let interval = &table.intervals[idx];
        let matched = ranges[idx];
        GroundTruthFields {
            start: matched.start,
            end: matched.end,
            start_rel: seconds_between(table.recording_start_time, matched.start),
            end_rel: seconds_between(table.recording_start_time, matched.end),
            class_id: interval.class_id.clone(),
            quality: interval.quality.clone(),
            notes: interval.notes.clone(),
            song: interval.song.clone(),
            call_type: interval.call_type.clone(),
            likely_sex: interval.likely_sex.clone(),
        }
    });

    Ok(MatchedRecord {
        ground_truth_file: gt_name.to_string(),
        binary_prediction_file: base_name(binary_path),
        multiclass_prediction_file: base_name(&excerpt.file_path),
        binary_start: window.start,
        binary_end: window.end,
        binary_start_rel: seconds_between(table.recording_start_time, window.start),
        binary_end_rel: seconds_between(table.recording_start_time, window.end),
        multiclass_prediction: prediction,
        ground_truth,
    })
}

/// Evaluate every ground-truth file in the map, skipping failures.
pub fn run_evaluation(
    file_map: &FileMap,
    options: EvalOptions,
    progress_enabled: bool,
) -> Vec<MatchedRecord> {
    let file_progress = progress::create_file_progress(file_map.len(), progress_enabled);

    let mut all_records = Vec::new();
    let mut errors = 0_usize;
    for (gt_path, binaries) in &file_map.entries {
        match evaluate_ground_truth(Path::new(gt_path), binaries, options) {
            Ok(mut records) => all_records.append(&mut records),
            Err(e) => {
                error!("Skipping ground truth file {gt_path}: {e}");
                errors += 1;
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }
    progress::finish_progress(file_progress, "Complete");

    if errors > 0 {
        info!("{errors} ground truth file(s) could not be evaluated");
    }
    all_records
}

/// Execute the `eval` command.
pub fn execute(args: &EvalArgs, config: &Config, progress_enabled: bool) -> Result<()> {
    let file_map = FileMap::load(&args.file_map)?;
    let options = EvalOptions {
        threshold: args.threshold.or(config.defaults.threshold),
    };

    let records = run_evaluation(&file_map, options, progress_enabled);

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.defaults.results_dir.clone());
    std::fs::create_dir_all(&output_dir).map_err(|e| Error::OutputDirCreateFailed {
        path: output_dir.clone(),
        source: e,
    })?;

    let output_path = output_dir.join(PREDICTION_RESULTS);
    let mut writer = ResultsWriter::create(&output_path, config.output.csv_bom)?;
    for record in &records {
        writer.write_record(record)?;
    }
    writer.finalize()?;

    info!(
        "Wrote {} matched records to {}",
        records.len(),
        output_path.display()
    );
    Ok(())
}

/// File name portion of a path, lossily decoded.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
}
