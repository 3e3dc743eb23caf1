//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "deteval";

/// Filename conventions for logs, audio, and annotation tables.
pub mod filenames {
    /// Suffix appended by the detector to its per-file prediction logs.
    pub const LOG_SUFFIX: &str = "_predict_output.log";

    /// Suffix carried by annotation (selection) tables.
    pub const ANNOTATION_SUFFIX: &str = ".Table.1.selections.FINAL.txt";

    /// Extension of source audio files referenced by prediction logs.
    pub const AUDIO_EXTENSION: &str = ".wav";

    /// Extension used when discovering prediction logs.
    pub const LOG_EXTENSION: &str = "log";

    /// Extension used when discovering annotation tables.
    pub const ANNOTATION_EXTENSION: &str = "txt";

    /// Date token format embedded in filenames.
    pub const DATE_FORMAT: &str = "%Y%m%d";

    /// Time token format embedded in filenames.
    pub const TIME_FORMAT: &str = "%H%M%S";

    /// Unit suffix on excerpt offset tokens.
    pub const MS_SUFFIX: &str = "ms";

    /// Number of leading underscore components that identify a recording
    /// when associating annotation tables with binary prediction logs.
    pub const LEADING_COMPONENTS: usize = 3;
}

/// Prediction log format markers.
pub mod log_format {
    /// Marker identifying a frame line.
    pub const FRAME_MARKER: &str = "|time=";

    /// Separator between fields in a frame line payload.
    pub const FIELD_SEPARATOR: &str = ", ";

    /// Marker on the optional header line preceding a class score block.
    pub const OUTPUT_LAYER_MARKER: &str = "output_layer";

    /// Class label assigned to positive binary frames.
    pub const POSITIVE_LABEL: &str = "target";

    /// Class label assigned to negative binary frames.
    pub const NEGATIVE_LABEL: &str = "noise";
}

/// Annotation table column layout.
///
/// Begin/end times and the trailing metadata columns are positional in
/// the source tables; the remaining metadata columns are matched by
/// header name (case-insensitive).
pub mod annotation_columns {
    /// Zero-based index of the begin-time column.
    pub const BEGIN_TIME: usize = 3;
    /// Zero-based index of the end-time column.
    pub const END_TIME: usize = 4;
    /// Zero-based index of the call-type column.
    pub const CALL_TYPE: usize = 16;
    /// Zero-based index of the likely-sex column.
    pub const LIKELY_SEX: usize = 17;
    /// Header of the class label column.
    pub const CLASS: &str = "sex";
    /// Header of the quality column.
    pub const QUALITY: &str = "quality";
    /// Header of the notes column.
    pub const NOTES: &str = "notes";
    /// Header of the song column.
    pub const SONG: &str = "song";
}

/// Selection table output format constants.
pub mod selection_table {
    /// View column value.
    pub const VIEW: &str = "Spectrogram 1";
    /// Channel column value.
    pub const CHANNEL: u8 = 1;
    /// Suffix replacing `.txt` on per-table prediction output files.
    pub const PREDICTIONS_SUFFIX: &str = "predictions.txt";
}

/// Output file names produced by the evaluation commands.
pub mod results {
    /// Matched-record output of the `eval` command.
    pub const PREDICTION_RESULTS: &str = "prediction_results.csv";
    /// Annotation-side output of the `ground-truth` command.
    pub const GROUND_TRUTH_RESULTS: &str = "ground_truth_analysis.csv";
    /// Default file map name written by the `map` command.
    pub const FILE_MAP: &str = "file_map.json";
    /// Prefix of per-log raw frame CSVs written by the `events` command.
    pub const RAW_PREFIX: &str = "raw_";
    /// Prefix of per-log grouped event CSVs written by the `events` command.
    pub const POSITIVE_PREFIX: &str = "positive_";
}

/// Timestamp formatting for CSV output and round-trips.
pub mod timestamps {
    /// Format for absolute timestamps in output files. The fractional
    /// part is emitted only when non-zero and accepted as optional when
    /// parsing results back.
    pub const CSV_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
}

/// UTF-8 Byte Order Mark for Excel compatibility in CSV files.
pub const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";
