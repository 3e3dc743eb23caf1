//! Annotation (selection) table loading.
//!
//! Ground-truth tables are tab-separated selection tables with
//! begin/end time columns at fixed positions and free-form metadata
//! columns. The table's absolute recording start comes from the same
//! filename date/time convention the prediction logs use.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::constants::annotation_columns;
use crate::error::{Error, Result};
use crate::matching::TimeRange;
use crate::utils::filename;

/// One human-labeled time interval with its metadata.
#[derive(Debug, Clone, Default)]
pub struct AnnotationInterval {
    /// Interval start in seconds, relative to the table's recording start.
    pub start_t: f64,
    /// Interval end in seconds.
    pub end_t: f64,
    /// Annotated class label.
    pub class_id: String,
    /// Annotation quality grade.
    pub quality: String,
    /// Free-form notes.
    pub notes: String,
    /// Song marker.
    pub song: String,
    /// Call type.
    pub call_type: String,
    /// Annotator's sex assessment.
    pub likely_sex: String,
}

/// A parsed annotation table.
#[derive(Debug, Clone)]
pub struct AnnotationTable {
    /// Path of the table file.
    pub file_path: PathBuf,
    /// Absolute recording start, resolved from the table filename.
    pub recording_start_time: NaiveDateTime,
    /// Intervals in table row order. Matching depends on this order.
    pub intervals: Vec<AnnotationInterval>,
}

impl AnnotationTable {
    /// Absolute time ranges of all intervals, in row order.
    pub fn interval_ranges(&self) -> Vec<TimeRange> {
        self.intervals
            .iter()
            .map(|i| TimeRange::from_offsets(self.recording_start_time, i.start_t, i.end_t))
            .collect()
    }
}

/// Parse a tab-separated annotation table.
///
/// Begin and end times are positional; class, quality, notes, and song
/// are matched by header name (case-insensitive) and left empty when
/// the table has no such column; call type and likely sex are the
/// trailing positional columns and likewise optional.
pub fn parse_annotation_table(path: &Path) -> Result<AnnotationTable> {
    let stem = filename::annotation_stem(path);
    let recording_start_time = filename::recording_start_time(&stem)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::AnnotationParseFailed {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let headers = reader
        .headers()
        .map_err(|e| Error::AnnotationParseFailed {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?
        .clone();
    let class_idx = named_column(&headers, annotation_columns::CLASS);
    let quality_idx = named_column(&headers, annotation_columns::QUALITY);
    let notes_idx = named_column(&headers, annotation_columns::NOTES);
    let song_idx = named_column(&headers, annotation_columns::SONG);

    let mut intervals = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::AnnotationParseFailed {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        let start_t = time_field(&record, annotation_columns::BEGIN_TIME, row)?;
        let end_t = time_field(&record, annotation_columns::END_TIME, row)?;

        intervals.push(AnnotationInterval {
            start_t,
            end_t,
            class_id: field(&record, class_idx),
            quality: field(&record, quality_idx),
            notes: field(&record, notes_idx),
            song: field(&record, song_idx),
            call_type: field(&record, Some(annotation_columns::CALL_TYPE)),
            likely_sex: field(&record, Some(annotation_columns::LIKELY_SEX)),
        });
    }

    Ok(AnnotationTable {
        file_path: path.to_path_buf(),
        recording_start_time,
        intervals,
    })
}

/// Index of a header matched case-insensitively, if present.
fn named_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// A string field by optional index; empty when absent.
fn field(record: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i))
        .map_or_else(String::new, |v| v.trim().to_string())
}

/// A required positional time field.
fn time_field(record: &csv::StringRecord, idx: usize, row: usize) -> Result<f64> {
    record
        .get(idx)
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| Error::InvalidAnnotationFormat {
            message: format!("row {}: missing or unparseable time in column {}", row + 2, idx + 1),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Selection\tView\tChannel\tBegin Time (s)\tEnd Time (s)\tLow Freq (Hz)\tHigh Freq (Hz)\tsex\tquality\tnotes\tsong\tc12\tc13\tc14\tc15\tc16\tcall type\tlikely sex";

    fn write_table(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        path
    }

    #[test]
    fn test_parse_annotation_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(
            dir.path(),
            "N9_S00920_20220516_053000.Table.1.selections.FINAL.txt",
            &[
                "1\tSpectrogram 1\t1\t12.5\t15.0\t400\t8000\tm\tgood\tfaint\ty\t\t\t\t\t\tsong-a\tm",
                "2\tSpectrogram 1\t1\t42.0\t44.5\t400\t8000\tf\tok\t\tn\t\t\t\t\t\tcall-b\tf",
            ],
        );

        let table = parse_annotation_table(&path).unwrap();
        assert_eq!(
            table.recording_start_time.to_string(),
            "2022-05-16 05:30:00"
        );
        assert_eq!(table.intervals.len(), 2);

        let first = &table.intervals[0];
        assert_eq!(first.start_t, 12.5);
        assert_eq!(first.end_t, 15.0);
        assert_eq!(first.class_id, "m");
        assert_eq!(first.quality, "good");
        assert_eq!(first.notes, "faint");
        assert_eq!(first.song, "y");
        assert_eq!(first.call_type, "song-a");
        assert_eq!(first.likely_sex, "m");

        assert_eq!(table.intervals[1].class_id, "f");
    }

    #[test]
    fn test_missing_metadata_columns_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("N9_20220516_053000.Table.1.selections.FINAL.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Selection\tView\tChannel\tBegin Time (s)\tEnd Time (s)").unwrap();
        writeln!(file, "1\tSpectrogram 1\t1\t3.0\t6.0").unwrap();

        let table = parse_annotation_table(&path).unwrap();
        let interval = &table.intervals[0];
        assert_eq!(interval.start_t, 3.0);
        assert_eq!(interval.class_id, "");
        assert_eq!(interval.call_type, "");
    }

    #[test]
    fn test_unparseable_time_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("N9_20220516_053000.Table.1.selections.FINAL.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Selection\tView\tChannel\tBegin Time (s)\tEnd Time (s)").unwrap();
        writeln!(file, "1\tSpectrogram 1\t1\tnot-a-number\t6.0").unwrap();

        let result = parse_annotation_table(&path);
        assert!(matches!(result, Err(Error::InvalidAnnotationFormat { .. })));
    }

    #[test]
    fn test_filename_without_date_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-date.Table.1.selections.FINAL.txt");
        std::fs::File::create(&path).unwrap();

        let result = parse_annotation_table(&path);
        assert!(matches!(result, Err(Error::MalformedFilename { .. })));
    }

    #[test]
    fn test_interval_ranges_are_anchored_absolutely() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(
            dir.path(),
            "N9_S00920_20220516_053000.Table.1.selections.FINAL.txt",
            &["1\tSpectrogram 1\t1\t60.0\t90.0\t400\t8000\tm\t\t\t\t\t\t\t\t\t\t"],
        );

        let table = parse_annotation_table(&path).unwrap();
        let ranges = table.interval_ranges();
        assert_eq!(ranges[0].start.to_string(), "2022-05-16 05:31:00");
        assert_eq!(ranges[0].end.to_string(), "2022-05-16 05:31:30");
    }
}
