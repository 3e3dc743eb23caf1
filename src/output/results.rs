//! Evaluation results CSV: writers and reader.
//!
//! Both the excerpt-centric (`eval`) and the annotation-centric
//! (`ground-truth`) outputs share one column set; the two writers here
//! fill it from opposite sides. The reader loads an `eval` results
//! file back for the commands that post-process it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::constants::UTF8_BOM;
use crate::constants::timestamps::CSV_FORMAT;
use crate::error::{Error, Result};
use crate::matching::TimeRange;
use crate::output::types::{GroundTruthRecord, MatchedRecord, format_timestamp};

/// Column header shared by both result flavors.
const HEADER: &str = "ground_truth_file,binary_prediction_file,multiclass_prediction_file,\
binary_start,binary_end,binary_start_rel,binary_end_rel,\
ground_truth_start,ground_truth_end,ground_truth_start_rel,ground_truth_end_rel,\
multiclass_prediction,ground_truth,quality,notes,song,call_type,likely_sex";

/// Writer for excerpt-centric evaluation results.
pub struct ResultsWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl ResultsWriter {
    /// Create the output file and write the header.
    pub fn create(path: &Path, bom: bool) -> Result<Self> {
        let mut writer = create_with_header(path, bom)?;
        writeln!(writer, "{HEADER}").map_err(|e| write_failed(path, e))?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    /// Append one matched record.
    pub fn write_record(&mut self, record: &MatchedRecord) -> Result<()> {
        let gt = record.ground_truth.as_ref();
        let row = [
            escape_csv(&record.ground_truth_file),
            escape_csv(&record.binary_prediction_file),
            escape_csv(&record.multiclass_prediction_file),
            format_timestamp(record.binary_start),
            format_timestamp(record.binary_end),
            record.binary_start_rel.to_string(),
            record.binary_end_rel.to_string(),
            gt.map_or_else(String::new, |g| format_timestamp(g.start)),
            gt.map_or_else(String::new, |g| format_timestamp(g.end)),
            gt.map_or_else(String::new, |g| g.start_rel.to_string()),
            gt.map_or_else(String::new, |g| g.end_rel.to_string()),
            escape_csv(&record.multiclass_prediction),
            gt.map_or_else(String::new, |g| escape_csv(&g.class_id)),
            gt.map_or_else(String::new, |g| escape_csv(&g.quality)),
            gt.map_or_else(String::new, |g| escape_csv(&g.notes)),
            gt.map_or_else(String::new, |g| escape_csv(&g.song)),
            gt.map_or_else(String::new, |g| escape_csv(&g.call_type)),
            gt.map_or_else(String::new, |g| escape_csv(&g.likely_sex)),
        ];
        writeln!(self.writer, "{}", row.join(",")).map_err(|e| write_failed(&self.path, e))
    }

    /// Flush buffered output.
    pub fn finalize(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| write_failed(&self.path, e))
    }
}

/// Writer for annotation-centric results.
pub struct GroundTruthWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl GroundTruthWriter {
    /// Create the output file and write the header.
    pub fn create(path: &Path, bom: bool) -> Result<Self> {
        let mut writer = create_with_header(path, bom)?;
        writeln!(writer, "{HEADER}").map_err(|e| write_failed(path, e))?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    /// Append one annotation-centric record.
    pub fn write_record(&mut self, record: &GroundTruthRecord) -> Result<()> {
        let pred = record.prediction.as_ref();
        let row = [
            escape_csv(&record.ground_truth_file),
            pred.map_or_else(String::new, |p| escape_csv(&p.binary_prediction_file)),
            pred.map_or_else(String::new, |p| escape_csv(&p.multiclass_prediction_file)),
            pred.map_or_else(String::new, |p| escape_csv(&p.binary_start)),
            pred.map_or_else(String::new, |p| escape_csv(&p.binary_end)),
            pred.map_or_else(String::new, |p| escape_csv(&p.binary_start_rel)),
            pred.map_or_else(String::new, |p| escape_csv(&p.binary_end_rel)),
            format_timestamp(record.ground_truth_start),
            format_timestamp(record.ground_truth_end),
            record.ground_truth_start_rel.to_string(),
            record.ground_truth_end_rel.to_string(),
            pred.map_or_else(String::new, |p| escape_csv(&p.multiclass_prediction)),
            escape_csv(&record.ground_truth),
            pred.map_or_else(String::new, |p| escape_csv(&p.quality)),
            pred.map_or_else(String::new, |p| escape_csv(&p.notes)),
            pred.map_or_else(String::new, |p| escape_csv(&p.song)),
            pred.map_or_else(String::new, |p| escape_csv(&p.call_type)),
            pred.map_or_else(String::new, |p| escape_csv(&p.likely_sex)),
        ];
        writeln!(self.writer, "{}", row.join(",")).map_err(|e| write_failed(&self.path, e))
    }

    /// Flush buffered output.
    pub fn finalize(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| write_failed(&self.path, e))
    }
}

/// One deserialized row of an `eval` results file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsRow {
    /// Ground-truth table file name.
    pub ground_truth_file: String,
    /// Binary prediction log file name.
    pub binary_prediction_file: String,
    /// Multiclass prediction log file name.
    pub multiclass_prediction_file: String,
    /// Absolute excerpt window start.
    pub binary_start: String,
    /// Absolute excerpt window end.
    pub binary_end: String,
    /// Relative window start.
    pub binary_start_rel: String,
    /// Relative window end.
    pub binary_end_rel: String,
    /// Absolute matched-annotation start (empty when unmatched).
    pub ground_truth_start: String,
    /// Absolute matched-annotation end.
    pub ground_truth_end: String,
    /// Relative matched-annotation start.
    pub ground_truth_start_rel: String,
    /// Relative matched-annotation end.
    pub ground_truth_end_rel: String,
    /// Aggregated predicted label.
    pub multiclass_prediction: String,
    /// Matched annotation class label.
    pub ground_truth: String,
    /// Quality grade.
    pub quality: String,
    /// Notes.
    pub notes: String,
    /// Song marker.
    pub song: String,
    /// Call type.
    pub call_type: String,
    /// Sex assessment.
    pub likely_sex: String,
}

impl ResultsRow {
    /// Absolute excerpt window parsed back from the row.
    pub fn binary_range(&self) -> Result<TimeRange> {
        Ok(TimeRange {
            start: parse_timestamp(&self.binary_start)?,
            end: parse_timestamp(&self.binary_end)?,
        })
    }
}

/// Parse a timestamp written by [`format_timestamp`].
fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, CSV_FORMAT).map_err(|_| Error::InvalidResultsFormat {
        message: format!("unparseable timestamp '{value}'"),
    })
}

/// Read an `eval` results file back into rows.
pub fn read_results(path: &Path) -> Result<Vec<ResultsRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::ResultsRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut rows = Vec::new();
    for (line_num, result) in reader.deserialize::<ResultsRow>().enumerate() {
        let row = result.map_err(|e| Error::InvalidResultsFormat {
            message: format!("line {}: {e}", line_num + 2),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn create_with_header(path: &Path, bom: bool) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| write_failed(path, e))?;
    let mut writer = BufWriter::new(file);
    if bom {
        writer.write_all(UTF8_BOM).map_err(|e| write_failed(path, e))?;
    }
    Ok(writer)
}

fn write_failed(path: &Path, source: std::io::Error) -> Error {
    Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Escape a value for CSV output.
pub(crate) fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
