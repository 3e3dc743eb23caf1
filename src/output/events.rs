//! Per-log frame and event CSV writers for the `events` command.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::annotations::AnnotationTable;
use crate::constants::UTF8_BOM;
use crate::error::{Error, Result};
use crate::log::{Event, PredictionLog};
use crate::matching::{add_seconds, seconds_between};
use crate::output::results::escape_csv;
use crate::output::types::format_timestamp;

const RAW_HEADER: &str = "log_file,audio_file,gt_file,rel_time_start,rel_time_end,\
abs_audio_time_start,abs_audio_time_end,abs_gt_time_start,abs_gt_time_end,\
rel_gt_time_start,rel_gt_time_end,pred,class_id,prob";

const POSITIVE_HEADER: &str = "log_file,audio_file,gt_file,rel_time_start,rel_time_end,\
abs_audio_time_start,abs_audio_time_end,abs_gt_time_start,abs_gt_time_end,\
rel_gt_time_start,rel_gt_time_end,class_id";

/// Time columns shared by both flavors: absolute frame/event times plus
/// the same instants expressed relative to the ground-truth recording
/// start.
fn time_columns(log: &PredictionLog, table: &AnnotationTable, start_t: f64, end_t: f64) -> String {
    let abs_start = add_seconds(log.recording_start_time, start_t);
    let abs_end = add_seconds(log.recording_start_time, end_t);
    let rel_gt_start = seconds_between(table.recording_start_time, abs_start);
    let rel_gt_end = seconds_between(table.recording_start_time, abs_end);
    format!(
        "{start_t},{end_t},{},{},{},{},{rel_gt_start},{rel_gt_end}",
        format_timestamp(abs_start),
        format_timestamp(abs_end),
        format_timestamp(abs_start),
        format_timestamp(abs_end),
    )
}

fn provenance_columns(log: &PredictionLog, table: &AnnotationTable) -> String {
    format!(
        "{},{},{}",
        escape_csv(&log.file_path.display().to_string()),
        escape_csv(&log.source_audio_path),
        escape_csv(&table.file_path.display().to_string()),
    )
}

fn create(path: &Path, bom: bool, header: &str) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| write_failed(path, e))?;
    let mut writer = BufWriter::new(file);
    if bom {
        writer.write_all(UTF8_BOM).map_err(|e| write_failed(path, e))?;
    }
    writeln!(writer, "{header}").map_err(|e| write_failed(path, e))?;
    Ok(writer)
}

fn write_failed(path: &Path, source: std::io::Error) -> Error {
    Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Write one row per frame of a binary log, with absolute times and
/// times relative to the associated ground-truth recording.
///
/// The `pred` column carries the frame's decision under the configured
/// positivity policy.
pub fn write_raw_frames_csv(
    path: &Path,
    log: &PredictionLog,
    table: &AnnotationTable,
    bom: bool,
) -> Result<()> {
    let mut writer = create(path, bom, RAW_HEADER)?;
    for frame in &log.frames {
        writeln!(
            writer,
            "{},{},{},{},{}",
            provenance_columns(log, table),
            time_columns(log, table, frame.start_t, frame.end_t),
            i32::from(frame.predicted_positive),
            escape_csv(&frame.class_label),
            frame.probability,
        )
        .map_err(|e| write_failed(path, e))?;
    }
    writer.flush().map_err(|e| write_failed(path, e))
}

/// Write one row per grouped event of a binary log.
pub fn write_positive_events_csv(
    path: &Path,
    log: &PredictionLog,
    events: &[Event],
    table: &AnnotationTable,
    bom: bool,
) -> Result<()> {
    let mut writer = create(path, bom, POSITIVE_HEADER)?;
    for event in events {
        writeln!(
            writer,
            "{},{},{}",
            provenance_columns(log, table),
            time_columns(log, table, event.start_t, event.end_t),
            escape_csv(&event.class_id),
        )
        .map_err(|e| write_failed(path, e))?;
    }
    writer.flush().map_err(|e| write_failed(path, e))
}
